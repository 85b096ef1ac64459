//! # Interledger Store
//!
//! Storage abstraction for ledger state. Provides a trait-based key/value
//! interface with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The protocol keeps each role's state under a handful of fixed keys and
//! composes its own read-then-write sequences, so the [`Store`] trait only
//! offers single-key operations. The primary implementation is
//! [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use interledger_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     store.put("id", Bytes::from_static(b"0")).await.unwrap();
//!     let value = store.get("id").await.unwrap();
//!     assert_eq!(value.as_deref(), Some(&b"0"[..]));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No transactions across calls**: a `get` followed by a `put` is two
//!   independent operations. Callers that need serializability must get it
//!   from the hosting platform.
//! - **Last write wins**: `put` replaces the previous value unconditionally.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::Store;
