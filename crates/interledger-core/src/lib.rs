//! # Interledger Core
//!
//! Pure primitives for interledger data transfer: identities, payloads,
//! protocol events, and the encoding of persisted state.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`TransferId`] - Sender-assigned identity of one transfer (the nonce)
//! - [`Payload`] - Opaque, platform-safe payload string
//! - [`TransferItem`] - An entry of the receiver's log
//! - [`SendingEvent`], [`AcceptedEvent`], [`RejectedEvent`] - Bus notifications
//!
//! ## Encoding
//!
//! All persisted values and event payloads are JSON. See [`state`] and
//! [`events`] for the exact shapes.

pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{CoreError, Result};
pub use events::{
    AcceptedEvent, ErrorCode, InterledgerEvent, ProtocolEvent, RejectedEvent, SendingEvent,
    ACCEPTED_EVENT, REJECTED_EVENT, SENDING_EVENT,
};
pub use state::{
    decode_items, decode_sequence, encode_items, encode_sequence, transfer_key, ResolutionRecord,
    TransferItem, TransferStatus, ITEMS_KEY, SEQUENCE_KEY,
};
pub use types::{Payload, TransferId};
