//! Error types for the ledger roles.

use interledger_core::{CoreError, TransferId};
use interledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during protocol operations.
///
/// None of these escape the invocation surface: [`crate::dispatch`] turns
/// every one of them into a failure response.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Setup was invoked with unexpected arguments.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// Stored state or an event could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] CoreError),

    /// The durable store failed; nothing was emitted.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The invoked function name is not part of the protocol.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A resolution named a transfer that was never emitted.
    #[error("unknown transfer: {0}")]
    UnknownTransfer(TransferId),

    /// Wrong argument count or an unparsable argument.
    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },

    /// The outbound sequence has no identities left.
    #[error("outbound sequence exhausted at {0}")]
    SequenceExhausted(TransferId),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
