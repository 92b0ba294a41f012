//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Quota exceeded writing '{key}': {requested} bytes requested, limit is {limit}")]
    QuotaExceeded {
        key: String,
        requested: usize,
        limit: usize,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
