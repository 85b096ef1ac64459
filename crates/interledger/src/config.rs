//! Configuration for the ledger roles.
//!
//! Every field defaults to the permissive baseline behavior.
//! The stricter settings exist so a deployment can opt into surfacing faults
//! the baseline silently tolerates.

use serde::{Deserialize, Serialize};

use interledger_core::CoreError;

use crate::error::{LedgerError, Result};

/// How to treat stored state that is missing or cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Treat it as the zero value (counter 0, empty log) and log a warning.
    #[default]
    Lenient,
    /// Fail the operation with a serialization error.
    Strict,
}

impl DecodePolicy {
    /// Decode the value stored under `key`, or fall back per policy.
    ///
    /// An absent value is the zero value under `Lenient`; under `Strict` it
    /// means the role was never initialized and is an error too.
    pub(crate) fn decode<T: Default>(
        &self,
        key: &str,
        stored: Option<&[u8]>,
        decode: impl FnOnce(&[u8]) -> std::result::Result<T, CoreError>,
    ) -> Result<T> {
        let decoded = match (stored, self) {
            (Some(bytes), _) => decode(bytes),
            (None, DecodePolicy::Lenient) => return Ok(T::default()),
            (None, DecodePolicy::Strict) => Err(CoreError::DecodingError(format!(
                "no value stored under {key:?}"
            ))),
        };

        match (decoded, self) {
            (Ok(value), _) => Ok(value),
            (Err(e), DecodePolicy::Lenient) => {
                tracing::warn!(key, error = %e, "undecodable state, using zero value");
                Ok(T::default())
            }
            (Err(e), DecodePolicy::Strict) => Err(LedgerError::Serialization(e)),
        }
    }
}

/// How to answer an invocation of a function the role does not define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOperationPolicy {
    /// Succeed without doing anything.
    #[default]
    Ignore,
    /// Fail with an unknown-operation error.
    Reject,
}

/// Configuration shared by [`crate::Sender`] and [`crate::Receiver`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Handling of missing or corrupt stored state.
    pub decode: DecodePolicy,
    /// Handling of unrecognized function names.
    pub unknown_operations: UnknownOperationPolicy,
    /// Refuse commit/abort for identities the sender never emitted.
    pub strict_resolve: bool,
}

impl LedgerConfig {
    /// Every strict option enabled.
    pub fn strict() -> Self {
        Self {
            decode: DecodePolicy::Strict,
            unknown_operations: UnknownOperationPolicy::Reject,
            strict_resolve: true,
        }
    }

    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))
    }
}
