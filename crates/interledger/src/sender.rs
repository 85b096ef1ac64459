//! The sending role.
//!
//! The sender owns a single outbound sequence. Every emit reads it, assigns
//! the next identity, writes it back, and only then announces the item on
//! the bus. A failed write means no announcement.
//!
//! The read-then-write is not atomic. Two emits racing on the same store can
//! assign the same identity; the hosting ledger must serialize invocations.

use bytes::Bytes;

use interledger_bus::NotificationBus;
use interledger_core::{
    decode_sequence, encode_sequence, InterledgerEvent, Payload, SendingEvent, TransferId,
    SEQUENCE_KEY,
};
use interledger_store::Store;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::resolution::{NoopResolution, Outcome, ResolutionHook};

/// The sending side of an interledger transfer.
pub struct Sender<S: Store, B: NotificationBus, H: ResolutionHook = NoopResolution> {
    store: S,
    bus: B,
    hook: H,
    config: LedgerConfig,
}

impl<S: Store, B: NotificationBus> Sender<S, B> {
    /// Create a sender with the no-op resolution hook.
    pub fn new(store: S, bus: B, config: LedgerConfig) -> Self {
        Self {
            store,
            bus,
            hook: NoopResolution,
            config,
        }
    }
}

impl<S: Store, B: NotificationBus, H: ResolutionHook> Sender<S, B, H> {
    /// Replace the resolution hook.
    pub fn with_hook<H2: ResolutionHook>(self, hook: H2) -> Sender<S, B, H2> {
        Sender {
            store: self.store,
            bus: self.bus,
            hook,
            config: self.config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Reset the outbound sequence to zero.
    ///
    /// Takes no arguments; any argument is an initialization error.
    pub async fn initialize(&self, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            return Err(LedgerError::Initialization(format!(
                "expected no arguments, got {}",
                args.len()
            )));
        }

        self.store
            .put(SEQUENCE_KEY, Bytes::from(encode_sequence(TransferId::ZERO)?))
            .await?;
        tracing::info!("sender initialized");
        Ok(())
    }

    /// Stage `payload` for transfer and announce it.
    ///
    /// Returns the identity assigned to the item. Effects, in order: one
    /// store read, one store write, one [`SendingEvent`] on the bus.
    pub async fn emit(&self, payload: Payload) -> Result<TransferId> {
        let current = self.current_identity().await?;
        let id = current
            .next()
            .ok_or(LedgerError::SequenceExhausted(current))?;

        // Encode everything up front so nothing can fail between the write
        // and the emission.
        let event = SendingEvent { id, data: payload };
        let notification = Bytes::from(event.encode()?);
        let sequence = Bytes::from(encode_sequence(id)?);

        if let Err(e) = self.store.put(SEQUENCE_KEY, sequence).await {
            tracing::warn!(%id, error = %e, "sequence write failed, item not announced");
            return Err(e.into());
        }

        self.bus.emit(SendingEvent::NAME, notification);
        tracing::debug!(%id, payload_len = event.data.len(), "item emitted");
        Ok(id)
    }

    /// Apply the receiver's verdict on transfer `id`.
    ///
    /// Unknown identities succeed unless `strict_resolve` is set. Resolving
    /// never touches the outbound sequence.
    pub async fn resolve(&self, id: TransferId, outcome: Outcome) -> Result<()> {
        if self.config.strict_resolve {
            let emitted = self.current_identity().await?;
            if id == TransferId::ZERO || id > emitted {
                return Err(LedgerError::UnknownTransfer(id));
            }
        }

        match outcome {
            Outcome::Commit => self.hook.on_commit(id).await?,
            Outcome::Abort { reason } => self.hook.on_abort(id, reason).await?,
        }
        tracing::debug!(%id, ?outcome, "transfer resolved");
        Ok(())
    }

    /// The most recently assigned identity, zero before the first emit.
    pub async fn current_identity(&self) -> Result<TransferId> {
        let stored = self.store.get(SEQUENCE_KEY).await?;
        self.config
            .decode
            .decode(SEQUENCE_KEY, stored.as_deref(), decode_sequence)
    }
}
