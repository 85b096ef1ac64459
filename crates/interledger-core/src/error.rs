//! Error types for the interledger core.

use thiserror::Error;

/// Errors from encoding or decoding protocol values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("invalid transfer identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid reason code: {0}")]
    InvalidReason(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
