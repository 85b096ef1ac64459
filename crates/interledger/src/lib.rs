//! # Interledger
//!
//! Exactly-once-intent data transfer between two independent ledgers.
//!
//! ## Overview
//!
//! Two roles cooperate without ever reading each other's state:
//!
//! - **[`Sender`]**: assigns each outgoing item a durable identity from its
//!   outbound sequence, announces it on the bus, and later applies the
//!   receiver's commit or abort through a [`ResolutionHook`].
//! - **[`Receiver`]**: appends each incoming item to its durable log and
//!   acknowledges it on the bus, subject to an [`AcceptancePolicy`].
//!
//! A relay outside this workspace carries notifications from one ledger to
//! operations on the other.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use interledger::{LedgerConfig, Payload, Receiver, Sender};
//! use interledger::bus::MemoryBus;
//! use interledger::store::SqliteStore;
//!
//! async fn example() {
//!     let sender = Sender::new(
//!         SqliteStore::open("sender.db").unwrap(),
//!         Arc::new(MemoryBus::new()),
//!         LedgerConfig::default(),
//!     );
//!     sender.initialize(&[]).await.unwrap();
//!     let id = sender.emit(Payload::from_bytes(b"hello")).await.unwrap();
//!
//!     let receiver = Receiver::new(
//!         SqliteStore::open("receiver.db").unwrap(),
//!         Arc::new(MemoryBus::new()),
//!         LedgerConfig::default(),
//!     );
//!     receiver.initialize(&[]).await.unwrap();
//!     receiver.receive(id, Payload::from_bytes(b"hello")).await.unwrap();
//! }
//! ```
//!
//! ## Ordering
//!
//! Every operation persists before it notifies. If the write fails the
//! operation fails and nothing is emitted.
//!
//! ## Concurrency
//!
//! Operations are read-modify-write sequences over a single key and are not
//! atomic across concurrent invocations. The hosting ledger must serialize
//! invocations per role; this crate does no locking of its own.
//!
//! ## Re-exports
//!
//! - `interledger::core` - Identities, payloads, events, state encoding
//! - `interledger::store` - Storage abstraction and SQLite
//! - `interledger::bus` - Notification bus

pub mod acceptance;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod receiver;
pub mod resolution;
pub mod sender;

// Re-export component crates
pub use interledger_bus as bus;
pub use interledger_core as core;
pub use interledger_store as store;

// Re-export main types for convenience
pub use acceptance::{AcceptAll, AcceptancePolicy, RejectDuplicates, Verdict};
pub use config::{DecodePolicy, LedgerConfig, UnknownOperationPolicy};
pub use dispatch::{Contract, Invocation, ReceiverRequest, Response, SenderRequest};
pub use error::{LedgerError, Result};
pub use receiver::{ReceiveOutcome, Receiver};
pub use resolution::{NoopResolution, Outcome, RecordingResolution, ResolutionHook};
pub use sender::Sender;

pub use interledger_core::{
    AcceptedEvent, ErrorCode, Payload, RejectedEvent, SendingEvent, TransferId, TransferItem,
    TransferStatus,
};
