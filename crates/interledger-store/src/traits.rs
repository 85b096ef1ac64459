//! Store trait: the abstract interface for ledger state persistence.
//!
//! The protocol needs nothing more than single-key reads and writes. Any
//! read-modify-write sequence is composed by the caller and is not atomic
//! across concurrent callers; the hosting platform is expected to serialize
//! invocations that touch the same key.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// The Store trait: async key/value persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, `spawn_blocking` is used internally to avoid blocking the
/// runtime.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Bytes) -> Result<()>;

    /// List keys starting with `prefix`, in lexicographic order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys_with_prefix(prefix).await
    }
}

#[async_trait]
impl<S: Store + ?Sized> Store for Box<S> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys_with_prefix(prefix).await
    }
}
