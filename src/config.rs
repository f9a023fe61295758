use std::{
    env,
    fs::{create_dir_all, read_to_string},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use derive_getters::Getters;
use serde::Deserialize;

use crate::drive::{DriveEntry, EntryKind};

#[derive(Debug, Deserialize, Getters)]
pub struct Config {
    /// How long a `/set_folder` dialog waits for the folder name.
    #[serde(default = "reply_timeout_secs")]
    reply_timeout_secs: u64,
    #[serde(default = "cancel_keyword")]
    cancel_keyword: String,
    /// Upper bound on concurrently live selection sessions; the oldest one
    /// is evicted beyond this.
    #[serde(default = "session_capacity")]
    session_capacity: usize,
    /// Folder snapshot the bundled in-memory index is seeded with.
    #[serde(default)]
    folders: Vec<SeedFolder>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct SeedFolder {
    id: String,
    name: String,
    /// Ancestor path of the folder, root-relative.
    #[serde(default)]
    path: String,
}

impl Config {
    pub fn load_from_file(file: Option<PathBuf>) -> Self {
        let config_file = file.unwrap_or_else(default_location);
        if !config_file.exists() {
            return Self::default_config();
        }
        let config_contents = read_to_string(config_file).expect("config file should be readable");
        toml::from_str(&config_contents).expect("config should be parseable")
    }

    pub fn default_config() -> Self {
        toml::from_str("").expect("empty config should deserialize to defaults")
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }

    pub fn seed_entries(&self) -> Vec<DriveEntry> {
        self.folders
            .iter()
            .map(|folder| {
                DriveEntry::new(
                    folder.id(),
                    folder.name(),
                    EntryKind::Folder,
                    folder.path(),
                )
            })
            .collect()
    }
}

fn default_location() -> PathBuf {
    let mut config_dir = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from_str(&config_home).expect("XDG_CONFIG_HOME should be a parseable path")
    } else {
        let mut config_home = PathBuf::from_str(&env::var("HOME").expect("HOME should be set"))
            .expect("HOME should be a parseable path");
        config_home.push(".config");
        config_home
    };
    config_dir.push(env!("CARGO_PKG_NAME"));
    if !config_dir.exists() {
        create_dir_all(&config_dir).expect("config_dir should be creatable");
    }
    config_dir.push("config.toml");

    config_dir
}

fn reply_timeout_secs() -> u64 {
    60
}

fn cancel_keyword() -> String {
    "/cancel".to_owned()
}

fn session_capacity() -> usize {
    64
}
