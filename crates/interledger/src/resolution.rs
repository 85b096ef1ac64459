//! Sender-side resolution hooks.
//!
//! A commit or abort arrives as an independent invocation, possibly long
//! after the emit and possibly never. The hook is where a deployment turns
//! it into a state transition: release a provisional debit, mark an item
//! delivered, and so on. Hooks must tolerate unknown and repeated
//! identities, since the bus may duplicate acknowledgments.

use async_trait::async_trait;
use bytes::Bytes;

use interledger_core::{
    decode_sequence, transfer_key, ErrorCode, ResolutionRecord, TransferId, TransferStatus,
    SEQUENCE_KEY,
};
use interledger_store::Store;

use crate::config::DecodePolicy;
use crate::error::Result;

/// Outcome of a transfer, as reported back to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Commit,
    Abort { reason: ErrorCode },
}

impl Outcome {
    pub(crate) fn status(&self) -> TransferStatus {
        match self {
            Outcome::Commit => TransferStatus::Committed,
            Outcome::Abort { reason } => TransferStatus::Aborted { reason: *reason },
        }
    }
}

/// Extension point invoked by [`crate::Sender::resolve`].
#[async_trait]
pub trait ResolutionHook: Send + Sync {
    /// The receiver accepted transfer `id`.
    async fn on_commit(&self, id: TransferId) -> Result<()>;

    /// Transfer `id` was rejected or failed.
    async fn on_abort(&self, id: TransferId, reason: ErrorCode) -> Result<()>;
}

/// Accepts every resolution and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolution;

#[async_trait]
impl ResolutionHook for NoopResolution {
    async fn on_commit(&self, _id: TransferId) -> Result<()> {
        Ok(())
    }

    async fn on_abort(&self, _id: TransferId, _reason: ErrorCode) -> Result<()> {
        Ok(())
    }
}

/// Persists each resolution under `transfer/<id>`.
///
/// Give it the sender's own store to keep resolutions next to the outbound
/// sequence. A later resolution for the same identity replaces the earlier one.
///
/// The outbound sequence is read under the same [`DecodePolicy`] as the
/// sender's; pass the sender's policy with [`Self::with_decode`].
pub struct RecordingResolution<S: Store> {
    store: S,
    decode: DecodePolicy,
}

impl<S: Store> RecordingResolution<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            decode: DecodePolicy::default(),
        }
    }

    pub fn with_decode(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    async fn record(&self, id: TransferId, status: TransferStatus) -> Result<()> {
        let record = ResolutionRecord { id, status };
        self.store
            .put(&transfer_key(id), Bytes::from(record.encode()?))
            .await?;
        tracing::debug!(%id, ?status, "recorded transfer resolution");
        Ok(())
    }

    /// Current status of transfer `id`.
    ///
    /// An identity within the emitted range without a record is still
    /// [`TransferStatus::Sent`]. Returns `None` for identities never emitted.
    pub async fn status(&self, id: TransferId) -> Result<Option<TransferStatus>> {
        if let Some(bytes) = self.store.get(&transfer_key(id)).await? {
            return Ok(Some(ResolutionRecord::decode(&bytes)?.status));
        }

        let stored = self.store.get(SEQUENCE_KEY).await?;
        let emitted = self
            .decode
            .decode(SEQUENCE_KEY, stored.as_deref(), decode_sequence)?;
        if id != TransferId::ZERO && id <= emitted {
            Ok(Some(TransferStatus::Sent))
        } else {
            Ok(None)
        }
    }

    /// All persisted resolutions, ordered by identity.
    pub async fn records(&self) -> Result<Vec<ResolutionRecord>> {
        let mut records = Vec::new();
        for key in self
            .store
            .keys_with_prefix(interledger_core::state::TRANSFER_KEY_PREFIX)
            .await?
        {
            if let Some(bytes) = self.store.get(&key).await? {
                records.push(ResolutionRecord::decode(&bytes)?);
            }
        }
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

#[async_trait]
impl<S: Store> ResolutionHook for RecordingResolution<S> {
    async fn on_commit(&self, id: TransferId) -> Result<()> {
        self.record(id, Outcome::Commit.status()).await
    }

    async fn on_abort(&self, id: TransferId, reason: ErrorCode) -> Result<()> {
        self.record(id, Outcome::Abort { reason }.status()).await
    }
}
