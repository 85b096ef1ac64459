//! # Interledger Testkit
//!
//! Testing utilities for the interledger crates.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A sender and receiver pair with a relay between them
//! - **Faults**: A store wrapper that counts operations and fails on demand
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use interledger::{LedgerConfig, Payload};
//! use interledger_testkit::fixtures::TransferPair;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let pair = TransferPair::new(LedgerConfig::default());
//! pair.init().await;
//! pair.sender.emit(Payload::from("hello")).await.unwrap();
//!
//! let report = pair.relay().await;
//! assert_eq!(report.committed, 1);
//! # });
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use interledger_testkit::generators::EmitBatch;
//!
//! proptest! {
//!     #[test]
//!     fn identities_are_dense(batch: EmitBatch) {
//!         // emit every payload, then check ids 1..=N
//!     }
//! }
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;

pub use faults::FaultyStore;
pub use fixtures::{RelayReport, TransferPair};
pub use generators::EmitBatch;
