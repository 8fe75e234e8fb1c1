//! Persistence layer for seedling
//!
//! Provides:
//! - The key-value backend seam (`get`/`put` of one serialized blob)
//! - SQLite, file and in-memory backends
//! - The versioned state document: load with migration, save

mod file;
mod memory;
mod snapshot;
mod sqlite;
mod traits;

pub use file::*;
pub use memory::*;
pub use snapshot::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
