//! Protocol notifications.
//!
//! These are the only values that cross from one ledger to the other. Each
//! event has a fixed name on the notification bus and a JSON payload.
//!
//! ```text
//! Sender ledger                        Receiver ledger
//!   |-- InterledgerEventSending ------->|  {"Id":1,"Data":"..."}
//!   |<------ InterledgerEventAccepted --|  1
//!   |<------ InterledgerEventRejected --|  {"Nonce":1,"Reason":4}
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{Payload, TransferId};

/// Bus name of [`SendingEvent`].
pub const SENDING_EVENT: &str = "InterledgerEventSending";
/// Bus name of [`AcceptedEvent`].
pub const ACCEPTED_EVENT: &str = "InterledgerEventAccepted";
/// Bus name of [`RejectedEvent`].
pub const REJECTED_EVENT: &str = "InterledgerEventRejected";

/// A named protocol event with a JSON wire encoding.
pub trait InterledgerEvent: Serialize + DeserializeOwned {
    /// Event name on the notification bus.
    const NAME: &'static str;

    /// Encode the event payload.
    fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Decode an event payload.
    fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// Emitted by the sender for every staged item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendingEvent {
    #[serde(rename = "Id")]
    pub id: TransferId,
    #[serde(rename = "Data")]
    pub data: Payload,
}

impl InterledgerEvent for SendingEvent {
    const NAME: &'static str = SENDING_EVENT;
}

/// Emitted by the receiver once an item is durably recorded.
///
/// Encoded as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptedEvent {
    pub id: TransferId,
}

impl InterledgerEvent for AcceptedEvent {
    const NAME: &'static str = ACCEPTED_EVENT;
}

/// Emitted by the receiver when an acceptance policy refuses an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEvent {
    #[serde(rename = "Nonce")]
    pub id: TransferId,
    #[serde(rename = "Reason")]
    pub reason: ErrorCode,
}

impl InterledgerEvent for RejectedEvent {
    const NAME: &'static str = REJECTED_EVENT;
}

/// Reason codes carried by rejections and aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ErrorCode {
    Timeout,
    TransactionFailure,
    UnsupportedKsiHash,
    ApplicationReject,
    InquiryReject,
    /// A code this implementation does not know; preserved verbatim.
    Other(u32),
}

impl ErrorCode {
    pub const fn code(&self) -> u32 {
        match self {
            ErrorCode::Timeout => 1,
            ErrorCode::TransactionFailure => 2,
            ErrorCode::UnsupportedKsiHash => 3,
            ErrorCode::ApplicationReject => 4,
            ErrorCode::InquiryReject => 5,
            ErrorCode::Other(code) => *code,
        }
    }

    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => ErrorCode::Timeout,
            2 => ErrorCode::TransactionFailure,
            3 => ErrorCode::UnsupportedKsiHash,
            4 => ErrorCode::ApplicationReject,
            5 => ErrorCode::InquiryReject,
            other => ErrorCode::Other(other),
        }
    }
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        Self::from_code(code)
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .map(Self::from_code)
            .map_err(|e| CoreError::InvalidReason(format!("{s:?}: {e}")))
    }
}

/// Any protocol event, decoded by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    Sending(SendingEvent),
    Accepted(AcceptedEvent),
    Rejected(RejectedEvent),
}

impl ProtocolEvent {
    /// Decode a notification. Returns `Ok(None)` for names outside the protocol.
    pub fn decode(name: &str, payload: &[u8]) -> Result<Option<Self>> {
        let event = match name {
            SENDING_EVENT => ProtocolEvent::Sending(SendingEvent::decode(payload)?),
            ACCEPTED_EVENT => ProtocolEvent::Accepted(AcceptedEvent::decode(payload)?),
            REJECTED_EVENT => ProtocolEvent::Rejected(RejectedEvent::decode(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// The transfer this event refers to.
    pub fn id(&self) -> TransferId {
        match self {
            ProtocolEvent::Sending(e) => e.id,
            ProtocolEvent::Accepted(e) => e.id,
            ProtocolEvent::Rejected(e) => e.id,
        }
    }
}
