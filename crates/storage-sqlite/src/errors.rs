//! Storage error types and conversions into the core error type.

use thiserror::Error;

/// Errors raised by the SQLite storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    #[error("Schema initialization failed: {0}")]
    SchemaFailed(String),

    #[error("Stored value could not be interpreted: {0}")]
    Corrupt(String),
}

impl From<StorageError> for fundguard_core::Error {
    fn from(err: StorageError) -> Self {
        fundguard_core::Error::Repository(err.to_string())
    }
}
