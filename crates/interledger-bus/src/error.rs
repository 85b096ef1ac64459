//! Error types for the bus module.

use thiserror::Error;

/// Errors observed by bus subscribers.
///
/// Emission itself never fails from the caller's point of view; these
/// errors only surface on the consuming side.
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus was dropped; no further notifications will arrive.
    #[error("bus closed")]
    Closed,

    /// The subscriber fell behind and missed notifications.
    #[error("subscriber lagged, {0} notifications skipped")]
    Lagged(u64),

    /// Event payload could not be encoded or decoded.
    #[error("event codec error: {0}")]
    Codec(#[from] interledger_core::CoreError),
}

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
