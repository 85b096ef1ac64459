//! The receiving role.
//!
//! The receiver keeps an append-only log of every item it accepted. Each
//! receive reads the whole log, appends, writes the whole log back, and only
//! then acknowledges on the bus.
//!
//! With the default [`AcceptAll`] policy nothing is deduplicated: the same
//! identity delivered twice is logged twice and acknowledged twice.

use bytes::Bytes;

use interledger_bus::NotificationBus;
use interledger_core::{
    decode_items, encode_items, AcceptedEvent, InterledgerEvent, Payload, RejectedEvent,
    TransferId, TransferItem, ITEMS_KEY,
};
use interledger_store::Store;

use crate::acceptance::{AcceptAll, AcceptancePolicy, Verdict};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

/// What became of a received item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Appended to the log and acknowledged.
    Accepted,
    /// Already logged; acknowledged again without a write.
    AlreadyAccepted,
    /// Refused by the acceptance policy; a rejection was emitted instead.
    Rejected(interledger_core::ErrorCode),
}

/// The receiving side of an interledger transfer.
pub struct Receiver<S: Store, B: NotificationBus, P: AcceptancePolicy = AcceptAll> {
    store: S,
    bus: B,
    policy: P,
    config: LedgerConfig,
}

impl<S: Store, B: NotificationBus> Receiver<S, B> {
    /// Create a receiver that accepts every item.
    pub fn new(store: S, bus: B, config: LedgerConfig) -> Self {
        Self {
            store,
            bus,
            policy: AcceptAll,
            config,
        }
    }
}

impl<S: Store, B: NotificationBus, P: AcceptancePolicy> Receiver<S, B, P> {
    /// Replace the acceptance policy.
    pub fn with_policy<P2: AcceptancePolicy>(self, policy: P2) -> Receiver<S, B, P2> {
        Receiver {
            store: self.store,
            bus: self.bus,
            policy,
            config: self.config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Reset the log to empty.
    pub async fn initialize(&self, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            return Err(LedgerError::Initialization(format!(
                "expected no arguments, got {}",
                args.len()
            )));
        }

        self.store
            .put(ITEMS_KEY, Bytes::from(encode_items(&[])?))
            .await?;
        tracing::info!("receiver initialized");
        Ok(())
    }

    /// Record an incoming item and acknowledge it.
    ///
    /// Effects, in order: one store read, one store write, one
    /// [`AcceptedEvent`] on the bus. If the policy rejects, the write is
    /// skipped and a [`RejectedEvent`] is emitted instead. If the policy
    /// finds the item already logged, the write is skipped and the
    /// [`AcceptedEvent`] is emitted again.
    pub async fn receive(&self, id: TransferId, payload: Payload) -> Result<ReceiveOutcome> {
        let mut items = self.items().await?;
        let incoming = TransferItem::new(id, payload);
        let notification = Bytes::from(AcceptedEvent { id }.encode()?);

        match self.policy.evaluate(&items, &incoming) {
            Verdict::Accept => {}
            Verdict::AlreadyAccepted => {
                self.bus.emit(AcceptedEvent::NAME, notification);
                tracing::debug!(%id, "item already logged, acknowledged again");
                return Ok(ReceiveOutcome::AlreadyAccepted);
            }
            Verdict::Reject(reason) => {
                let rejection = RejectedEvent { id, reason };
                self.bus.emit(RejectedEvent::NAME, Bytes::from(rejection.encode()?));
                tracing::debug!(%id, ?reason, "item rejected");
                return Ok(ReceiveOutcome::Rejected(reason));
            }
        }

        items.push(incoming);
        let log = Bytes::from(encode_items(&items)?);

        if let Err(e) = self.store.put(ITEMS_KEY, log).await {
            tracing::warn!(%id, error = %e, "log write failed, item not acknowledged");
            return Err(e.into());
        }

        self.bus.emit(AcceptedEvent::NAME, notification);
        tracing::debug!(%id, log_len = items.len(), "item received");
        Ok(ReceiveOutcome::Accepted)
    }

    /// The decoded log, oldest first.
    pub async fn items(&self) -> Result<Vec<TransferItem>> {
        let stored = self.store.get(ITEMS_KEY).await?;
        self.config
            .decode
            .decode(ITEMS_KEY, stored.as_deref(), decode_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use interledger_bus::MemoryBus;
    use interledger_core::{ErrorCode, ProtocolEvent, ACCEPTED_EVENT, REJECTED_EVENT};
    use interledger_store::MemoryStore;

    use crate::acceptance::RejectDuplicates;
    use crate::config::DecodePolicy;

    fn receiver(config: LedgerConfig) -> Receiver<Arc<MemoryStore>, Arc<MemoryBus>> {
        Receiver::new(Arc::new(MemoryStore::new()), Arc::new(MemoryBus::new()), config)
    }

    #[tokio::test]
    async fn test_initialize_writes_empty_log() {
        let receiver = receiver(LedgerConfig::default());
        receiver.initialize(&[]).await.unwrap();
        assert_eq!(
            receiver.store().get(ITEMS_KEY).await.unwrap(),
            Some(Bytes::from_static(b"[]"))
        );

        let err = receiver.initialize(&["a".into(), "b".into()]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Initialization(_)));
    }

    #[tokio::test]
    async fn test_duplicate_identity_is_logged_twice() {
        let receiver = receiver(LedgerConfig::default());
        receiver.initialize(&[]).await.unwrap();

        let hello = TransferItem::new(TransferId(1), Payload::from("hello"));

        receiver.receive(TransferId(1), Payload::from("hello")).await.unwrap();
        assert_eq!(receiver.items().await.unwrap(), vec![hello.clone()]);
        assert_eq!(
            receiver.bus().events().unwrap(),
            vec![ProtocolEvent::Accepted(AcceptedEvent { id: TransferId(1) })]
        );

        let outcome = receiver.receive(TransferId(1), Payload::from("hello")).await.unwrap();
        assert_eq!(outcome, ReceiveOutcome::Accepted);
        assert_eq!(receiver.items().await.unwrap(), vec![hello.clone(), hello]);
        assert_eq!(receiver.bus().count(ACCEPTED_EVENT), 2);
    }

    #[tokio::test]
    async fn test_null_log_reads_as_empty() {
        let receiver = receiver(LedgerConfig {
            decode: DecodePolicy::Strict,
            ..LedgerConfig::default()
        });
        receiver
            .store()
            .put(ITEMS_KEY, Bytes::from_static(b"null"))
            .await
            .unwrap();

        receiver.receive(TransferId(3), Payload::from("x")).await.unwrap();
        assert_eq!(receiver.items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_log_lenient_starts_over() {
        let receiver = receiver(LedgerConfig::default());
        receiver
            .store()
            .put(ITEMS_KEY, Bytes::from_static(b"[{\"Nonce\":"))
            .await
            .unwrap();

        receiver.receive(TransferId(9), Payload::from("x")).await.unwrap();
        assert_eq!(
            receiver.items().await.unwrap(),
            vec![TransferItem::new(TransferId(9), Payload::from("x"))]
        );
    }

    #[tokio::test]
    async fn test_corrupt_log_strict_fails_without_ack() {
        let receiver = receiver(LedgerConfig {
            decode: DecodePolicy::Strict,
            ..LedgerConfig::default()
        });
        receiver
            .store()
            .put(ITEMS_KEY, Bytes::from_static(b"42"))
            .await
            .unwrap();

        let err = receiver.receive(TransferId(1), Payload::from("x")).await.unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
        assert!(receiver.bus().is_empty());
    }

    #[tokio::test]
    async fn test_reject_duplicates_reacknowledges_redelivery() {
        let receiver = receiver(LedgerConfig::default()).with_policy(RejectDuplicates);
        receiver.initialize(&[]).await.unwrap();

        receiver.receive(TransferId(1), Payload::from("a")).await.unwrap();
        let outcome = receiver.receive(TransferId(1), Payload::from("a")).await.unwrap();

        assert_eq!(outcome, ReceiveOutcome::AlreadyAccepted);
        assert_eq!(receiver.items().await.unwrap().len(), 1);
        assert_eq!(receiver.bus().count(ACCEPTED_EVENT), 2);
        assert_eq!(receiver.bus().count(REJECTED_EVENT), 0);
    }

    #[tokio::test]
    async fn test_reject_duplicates_refuses_conflicting_payload() {
        let receiver = receiver(LedgerConfig::default()).with_policy(RejectDuplicates);
        receiver.initialize(&[]).await.unwrap();

        receiver.receive(TransferId(1), Payload::from("a")).await.unwrap();
        let outcome = receiver.receive(TransferId(1), Payload::from("b")).await.unwrap();

        assert_eq!(outcome, ReceiveOutcome::Rejected(ErrorCode::ApplicationReject));
        assert_eq!(
            receiver.items().await.unwrap(),
            vec![TransferItem::new(TransferId(1), Payload::from("a"))]
        );
        assert_eq!(receiver.bus().count(ACCEPTED_EVENT), 1);
        assert_eq!(
            receiver.bus().events().unwrap().last(),
            Some(&ProtocolEvent::Rejected(RejectedEvent {
                id: TransferId(1),
                reason: ErrorCode::ApplicationReject,
            }))
        );
    }
}
