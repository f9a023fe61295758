mod cli;
mod config;
mod console;
mod drive;
mod logging;
mod router;

use anyhow::Result;
use clap::Parser;
use log::info;
use tokio::sync::mpsc;

use cli::Cli;
use config::Config;
use console::ConsoleTransport;
use drive::InMemoryIndex;
use router::Router;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = Config::load_from_file(cli.config);

    let index = InMemoryIndex::new(config.seed_entries());
    let (events, inbox) = mpsc::channel(32);
    let mut router = Router::new(&index, ConsoleTransport, &config);

    info!("drivebot ready, reading events from stdin");
    tokio::join!(router.run(inbox), console::read_events(events));

    info!(
        "{} files registered this session",
        index.registered_files().len()
    );
    Ok(())
}
