//! Notification bus abstraction.
//!
//! The bus is the only channel between the two ledgers. Emission is
//! fire-and-forget: there is no delivery confirmation and the caller never
//! waits on a remote party. Delivery downstream is at-least-once, unordered,
//! and may duplicate; that is the relay's concern, not the emitter's.

use std::sync::Arc;

use bytes::Bytes;

use interledger_core::{InterledgerEvent, ProtocolEvent};

use crate::error::Result;

/// A single emitted notification: event name plus encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    pub payload: Bytes,
}

impl Notification {
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Decode into a protocol event. `Ok(None)` for foreign event names.
    pub fn decode(&self) -> Result<Option<ProtocolEvent>> {
        Ok(ProtocolEvent::decode(&self.name, &self.payload)?)
    }
}

/// Outbound notification channel.
///
/// Implementations must not block and must not report delivery failures
/// to the caller.
pub trait NotificationBus: Send + Sync {
    /// Emit `payload` under `name`.
    fn emit(&self, name: &str, payload: Bytes);
}

impl<B: NotificationBus + ?Sized> NotificationBus for Arc<B> {
    fn emit(&self, name: &str, payload: Bytes) {
        (**self).emit(name, payload)
    }
}

impl<B: NotificationBus + ?Sized> NotificationBus for Box<B> {
    fn emit(&self, name: &str, payload: Bytes) {
        (**self).emit(name, payload)
    }
}

/// Extension trait for emitting typed protocol events.
pub trait BusExt: NotificationBus {
    /// Encode and emit a protocol event.
    ///
    /// Encoding happens before anything reaches the bus; an encoding error
    /// means nothing was emitted.
    fn publish<E: InterledgerEvent>(&self, event: &E) -> Result<()> {
        let payload = event.encode()?;
        self.emit(E::NAME, Bytes::from(payload));
        Ok(())
    }
}

impl<B: NotificationBus + ?Sized> BusExt for B {}

/// In-process bus for tests.
///
/// Keeps a log of everything emitted and fans each notification out to
/// live subscribers over a broadcast channel. The log is unbounded until
/// [`memory::MemoryBus::drain`] is called.
pub mod memory {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::sync::broadcast;

    use crate::error::BusError;

    /// Default per-subscriber buffer.
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// In-memory notification bus.
    pub struct MemoryBus {
        log: Mutex<Vec<Notification>>,
        sender: broadcast::Sender<Notification>,
    }

    impl MemoryBus {
        pub fn new() -> Self {
            Self::with_capacity(DEFAULT_CAPACITY)
        }

        /// Create a bus whose subscribers buffer up to `capacity` notifications.
        pub fn with_capacity(capacity: usize) -> Self {
            let (sender, _) = broadcast::channel(capacity.max(1));
            Self {
                log: Mutex::new(Vec::new()),
                sender,
            }
        }

        /// Subscribe to notifications emitted from now on.
        pub fn subscribe(&self) -> Subscription {
            Subscription {
                receiver: self.sender.subscribe(),
            }
        }

        /// Everything emitted so far, in emission order.
        pub fn notifications(&self) -> Vec<Notification> {
            match self.log.lock() {
                Ok(log) => log.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            }
        }

        /// Take and clear the emission log.
        pub fn drain(&self) -> Vec<Notification> {
            match self.log.lock() {
                Ok(mut log) => std::mem::take(&mut *log),
                Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
            }
        }

        /// Decoded protocol events, skipping foreign names.
        pub fn events(&self) -> Result<Vec<ProtocolEvent>> {
            let mut events = Vec::new();
            for notification in self.notifications() {
                if let Some(event) = notification.decode()? {
                    events.push(event);
                }
            }
            Ok(events)
        }

        /// Number of notifications emitted under `name`.
        pub fn count(&self, name: &str) -> usize {
            self.notifications().iter().filter(|n| n.name == name).count()
        }

        pub fn is_empty(&self) -> bool {
            self.notifications().is_empty()
        }
    }

    impl Default for MemoryBus {
        fn default() -> Self {
            Self::new()
        }
    }

    impl NotificationBus for MemoryBus {
        fn emit(&self, name: &str, payload: Bytes) {
            let notification = Notification::new(name, payload);
            match self.log.lock() {
                Ok(mut log) => log.push(notification.clone()),
                Err(poisoned) => poisoned.into_inner().push(notification.clone()),
            }
            // No subscribers is not an error for a fire-and-forget bus
            if self.sender.send(notification).is_err() {
                tracing::trace!(event = name, "notification emitted with no subscribers");
            }
        }
    }

    /// A live view of a [`MemoryBus`].
    pub struct Subscription {
        receiver: broadcast::Receiver<Notification>,
    }

    impl Subscription {
        /// Wait for the next notification.
        pub async fn recv(&mut self) -> Result<Notification> {
            self.receiver.recv().await.map_err(|e| match e {
                broadcast::error::RecvError::Closed => BusError::Closed,
                broadcast::error::RecvError::Lagged(n) => BusError::Lagged(n),
            })
        }

        /// Wait for the next notification, at most `timeout`.
        ///
        /// Returns `Ok(None)` if the timeout expires first.
        pub async fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Notification>> {
            match tokio::time::timeout(timeout, self.recv()).await {
                Ok(result) => result.map(Some),
                Err(_) => Ok(None),
            }
        }

        /// Take a notification if one is already buffered.
        pub fn try_recv(&mut self) -> Result<Option<Notification>> {
            match self.receiver.try_recv() {
                Ok(notification) => Ok(Some(notification)),
                Err(broadcast::error::TryRecvError::Empty) => Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => Err(BusError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(n)) => Err(BusError::Lagged(n)),
            }
        }
    }
}
