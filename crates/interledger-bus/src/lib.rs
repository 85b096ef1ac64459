//! # Interledger Bus
//!
//! Outbound notification channel between ledgers.
//!
//! ## Overview
//!
//! Each ledger announces protocol progress by emitting named events. A
//! relay (outside this workspace) watches one ledger's notifications and
//! invokes the matching operation on the other ledger. The two sides never
//! read each other's state directly.
//!
//! ## Key Properties
//!
//! - **Fire-and-forget**: `emit` returns nothing and never blocks
//! - **No round-trip**: acknowledgments arrive later as fresh invocations
//! - **At-least-once downstream**: consumers must tolerate duplicates
//!
//! ## Message Flow
//!
//! ```text
//! Sender ledger          relay            Receiver ledger
//!   |-- Sending -------->|                      |
//!   |                    |-- receive(id, data)->|
//!   |                    |<------- Accepted ----|
//!   |<- commit(id) ------|                      |
//! ```

pub mod bus;
pub mod error;

pub use bus::memory::{MemoryBus, Subscription, DEFAULT_CAPACITY};
pub use bus::{BusExt, Notification, NotificationBus};
pub use error::{BusError, Result};
