// src/storage/mod.rs
// This module handles all data persistence, including the database and replay log.

pub mod db;
pub mod replay_log;

use thiserror::Error;

// Re-export the main structs for easier access.
pub use self::db::DatabaseManager;
pub use self::replay_log::ReplayLogger;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not (de)serialize statistics: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad timestamp {value:?} in stored state: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
