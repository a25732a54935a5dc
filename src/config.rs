// src/config.rs
// Study settings, with defaults that can be overridden from a JSON file.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Overrides `data_directory` when set.
pub const DATA_DIR_ENV: &str = "WORDBRICK_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_directory: PathBuf,
    pub cards_per_session: usize,
    pub review_new_cards_first: bool,
    pub show_examples: bool,
    pub difficult_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_directory: PathBuf::from("wordbrick-data"),
            cards_per_session: 20,
            review_new_cards_first: true,
            show_examples: true,
            difficult_threshold: 4,
        }
    }

    /// Reads settings from `path`. A missing file yields the defaults; a file
    /// that does not parse is reported and also yields the defaults.
    pub fn load(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Config>(&text) {
                Ok(config) => {
                    info!("Loaded settings from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Ignoring malformed settings file {:?}: {}", path, e);
                    Config::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Config::new(),
            Err(e) => {
                warn!("Could not read settings file {:?}: {}", path, e);
                Config::new()
            }
        };

        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            config.data_directory = PathBuf::from(dir);
        }
        config
    }
}
