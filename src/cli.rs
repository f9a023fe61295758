use std::path::PathBuf;

use clap::Parser;

/// Route files from a messaging transport into a drive folder hierarchy.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config file to use instead of the one in the XDG config directory.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}
