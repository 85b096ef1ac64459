//! Persisted protocol state and its encoding.
//!
//! Each role keeps its state under a single fixed key:
//!
//! - the sender's outbound sequence under [`SEQUENCE_KEY`], a JSON number;
//! - the receiver's item log under [`ITEMS_KEY`], a JSON array.
//!
//! Decoding is strict here. Whether a corrupt value is an error or a zero
//! value is a caller decision.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::events::ErrorCode;
use crate::types::{Payload, TransferId};

/// Store key of the sender's outbound sequence.
pub const SEQUENCE_KEY: &str = "id";
/// Store key of the receiver's item log.
pub const ITEMS_KEY: &str = "items";
/// Store key prefix of sender-side resolution records.
pub const TRANSFER_KEY_PREFIX: &str = "transfer/";

/// Store key of the resolution record for `id`.
pub fn transfer_key(id: TransferId) -> String {
    format!("{TRANSFER_KEY_PREFIX}{id}")
}

/// An item recorded by the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferItem {
    #[serde(rename = "Nonce")]
    pub id: TransferId,
    #[serde(rename = "Data")]
    pub data: Payload,
}

impl TransferItem {
    pub fn new(id: TransferId, data: Payload) -> Self {
        Self { id, data }
    }
}

/// Encode the outbound sequence value.
pub fn encode_sequence(value: TransferId) -> Result<Vec<u8>> {
    serde_json::to_vec(&value).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Decode the outbound sequence value.
pub fn decode_sequence(bytes: &[u8]) -> Result<TransferId> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Encode the receiver log.
pub fn encode_items(items: &[TransferItem]) -> Result<Vec<u8>> {
    serde_json::to_vec(items).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Decode the receiver log. A JSON `null` is an empty log.
pub fn decode_items(bytes: &[u8]) -> Result<Vec<TransferItem>> {
    let items: Option<Vec<TransferItem>> =
        serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    Ok(items.unwrap_or_default())
}

/// Sender-side lifecycle of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    /// Emitted; no resolution has arrived yet.
    Sent,
    /// The receiver accepted the item.
    Committed,
    /// The receiver rejected the item, or the transfer failed.
    Aborted { reason: ErrorCode },
}

impl TransferStatus {
    pub fn is_final(&self) -> bool {
        !matches!(self, TransferStatus::Sent)
    }
}

/// A persisted resolution of one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    #[serde(rename = "Id")]
    pub id: TransferId,
    #[serde(rename = "Status")]
    pub status: TransferStatus,
}

impl ResolutionRecord {
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}
