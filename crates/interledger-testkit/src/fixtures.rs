//! Test fixtures and helpers.
//!
//! [`TransferPair`] wires a sender and a receiver to separate stores and
//! buses and plays the part of the relay between them.

use std::sync::{Arc, Mutex};

use interledger::dispatch::{INTERLEDGER_ABORT, INTERLEDGER_COMMIT, INTERLEDGER_RECEIVE};
use interledger::{
    AcceptAll, AcceptancePolicy, Contract, Invocation, LedgerConfig, NoopResolution, Receiver,
    ResolutionHook, Response, Sender,
};
use interledger_bus::{MemoryBus, Notification};
use interledger_core::ProtocolEvent;

use crate::faults::FaultyStore;

/// Store type used on both sides of a [`TransferPair`].
pub type PairStore = Arc<FaultyStore>;
/// Bus type used on both sides of a [`TransferPair`].
pub type PairBus = Arc<MemoryBus>;

/// What one relay pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayReport {
    /// `interledgerReceive` invocations made on the receiver.
    pub delivered: usize,
    /// `interledgerCommit` invocations made on the sender.
    pub committed: usize,
    /// `interledgerAbort` invocations made on the sender.
    pub aborted: usize,
    /// Messages of invocations that came back as failures.
    pub failures: Vec<String>,
}

/// A sender and a receiver on independent stores and buses.
pub struct TransferPair<H: ResolutionHook = NoopResolution, P: AcceptancePolicy = AcceptAll> {
    pub sender: Sender<PairStore, PairBus, H>,
    pub receiver: Receiver<PairStore, PairBus, P>,
    pub sender_store: PairStore,
    pub sender_bus: PairBus,
    pub receiver_store: PairStore,
    pub receiver_bus: PairBus,
    /// Relay read positions in (sender bus, receiver bus).
    cursors: Mutex<(usize, usize)>,
}

impl TransferPair {
    /// Create an uninitialized pair sharing one configuration.
    pub fn new(config: LedgerConfig) -> Self {
        let sender_store: PairStore = Arc::new(FaultyStore::new());
        let sender_bus: PairBus = Arc::new(MemoryBus::new());
        let receiver_store: PairStore = Arc::new(FaultyStore::new());
        let receiver_bus: PairBus = Arc::new(MemoryBus::new());

        Self {
            sender: Sender::new(sender_store.clone(), sender_bus.clone(), config.clone()),
            receiver: Receiver::new(receiver_store.clone(), receiver_bus.clone(), config),
            sender_store,
            sender_bus,
            receiver_store,
            receiver_bus,
            cursors: Mutex::new((0, 0)),
        }
    }
}

impl<H: ResolutionHook, P: AcceptancePolicy> TransferPair<H, P> {
    /// Swap the sender's resolution hook.
    pub fn with_hook<H2: ResolutionHook>(self, hook: H2) -> TransferPair<H2, P> {
        TransferPair {
            sender: self.sender.with_hook(hook),
            receiver: self.receiver,
            sender_store: self.sender_store,
            sender_bus: self.sender_bus,
            receiver_store: self.receiver_store,
            receiver_bus: self.receiver_bus,
            cursors: self.cursors,
        }
    }

    /// Swap the receiver's acceptance policy.
    pub fn with_policy<P2: AcceptancePolicy>(self, policy: P2) -> TransferPair<H, P2> {
        TransferPair {
            sender: self.sender,
            receiver: self.receiver.with_policy(policy),
            sender_store: self.sender_store,
            sender_bus: self.sender_bus,
            receiver_store: self.receiver_store,
            receiver_bus: self.receiver_bus,
            cursors: self.cursors,
        }
    }

    /// Run both roles' init entry points.
    pub async fn init(&self) -> (Response, Response) {
        (self.sender.init(&[]).await, self.receiver.init(&[]).await)
    }

    /// Deliver every pending notification once, until both buses are quiet.
    pub async fn relay(&self) -> RelayReport {
        self.relay_with_copies(1).await
    }

    /// Like [`Self::relay`], but deliver each notification `copies` times,
    /// as an at-least-once relay might.
    pub async fn relay_with_copies(&self, copies: usize) -> RelayReport {
        let mut report = RelayReport::default();
        loop {
            let (outbound, inbound) = self.take_pending();
            if outbound.is_empty() && inbound.is_empty() {
                return report;
            }

            for notification in &outbound {
                let Ok(Some(ProtocolEvent::Sending(event))) = notification.decode() else {
                    continue;
                };
                let invocation = Invocation::new(
                    INTERLEDGER_RECEIVE,
                    [event.id.to_string(), event.data.into_string()],
                );
                for _ in 0..copies {
                    report.delivered += 1;
                    record(&mut report, self.receiver.invoke(&invocation).await);
                }
            }

            for notification in &inbound {
                let invocation = match notification.decode() {
                    Ok(Some(ProtocolEvent::Accepted(event))) => {
                        Invocation::new(INTERLEDGER_COMMIT, [event.id.to_string()])
                    }
                    Ok(Some(ProtocolEvent::Rejected(event))) => Invocation::new(
                        INTERLEDGER_ABORT,
                        [event.id.to_string(), event.reason.code().to_string()],
                    ),
                    _ => continue,
                };
                for _ in 0..copies {
                    if invocation.function == INTERLEDGER_COMMIT {
                        report.committed += 1;
                    } else {
                        report.aborted += 1;
                    }
                    record(&mut report, self.sender.invoke(&invocation).await);
                }
            }
        }
    }

    fn take_pending(&self) -> (Vec<Notification>, Vec<Notification>) {
        let outbound = self.sender_bus.notifications();
        let inbound = self.receiver_bus.notifications();
        let mut cursors = match self.cursors.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let pending = (
            outbound[cursors.0.min(outbound.len())..].to_vec(),
            inbound[cursors.1.min(inbound.len())..].to_vec(),
        );
        *cursors = (outbound.len(), inbound.len());
        pending
    }
}

fn record(report: &mut RelayReport, response: Response) {
    if let Some(message) = response.message() {
        report.failures.push(message.to_string());
    }
}
