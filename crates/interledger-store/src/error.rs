//! Store errors.

use thiserror::Error;

/// Errors returned by [`crate::Store`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running a database operation failed.
    #[error("background task failed: {0}")]
    Task(String),

    /// The backend refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Schema is missing, newer than this build, or failed to apply.
    #[error("schema migration failed: {0}")]
    Migration(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        StoreError::Task(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
