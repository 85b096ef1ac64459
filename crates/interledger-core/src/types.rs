//! Strong type definitions for interledger transfers.
//!
//! Identities and payloads are newtypes so a nonce can never be confused with
//! an arbitrary integer argument, nor a payload with a function name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Sender-assigned transfer identity (the "nonce").
///
/// The receiver treats it as an opaque idempotency key. The sender assigns
/// identities from its outbound sequence, starting at 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(pub u64);

impl TransferId {
    /// The value of an uninitialized sequence. Never assigned to a transfer.
    pub const ZERO: Self = Self(0);

    /// Create from a raw counter value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw counter value.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The identity following this one, or `None` if the sequence is exhausted.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Debug for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransferId({})", self.0)
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransferId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for TransferId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| CoreError::InvalidIdentity(format!("{s:?}: {e}")))
    }
}

/// An opaque, platform-safe transfer payload.
///
/// Ledger platforms generally cannot carry raw binary in event payloads, so
/// binary data travels as a `0x`-prefixed hex string. Any other string is
/// carried verbatim; the protocol never inspects the contents.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    /// Wrap an already encoded string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Encode raw bytes as a `0x`-prefixed lowercase hex string.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Decode a `0x`-prefixed hex payload back to bytes.
    pub fn decode_hex(&self) -> Result<Vec<u8>, CoreError> {
        let digits = self
            .0
            .strip_prefix("0x")
            .ok_or_else(|| CoreError::DecodingError("payload is not 0x-prefixed".into()))?;
        hex::decode(digits).map_err(|e| CoreError::DecodingError(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > 32 {
            let head: String = self.0.chars().take(32).collect();
            write!(f, "Payload({:?}.. {} bytes)", head, self.0.len())
        } else {
            write!(f, "Payload({:?})", self.0)
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
