//! Receiver-side acceptance policies.
//!
//! The baseline receiver accepts everything, duplicates included. A policy
//! that rejects does not touch the log; the rejection travels back to the
//! sender as a [`interledger_core::RejectedEvent`]. A redelivery of an item
//! already in the log is acknowledged again without being appended, so the
//! sender keeps seeing the same outcome for it.

use interledger_core::{ErrorCode, TransferItem};

/// Decision on an incoming item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Append and acknowledge.
    Accept,
    /// Already in the log: acknowledge again, leave the log alone.
    AlreadyAccepted,
    /// Leave the log alone and report the reason to the sender.
    Reject(ErrorCode),
}

/// Extension point consulted by [`crate::Receiver::receive`].
pub trait AcceptancePolicy: Send + Sync {
    /// Decide on `incoming` given the current log.
    fn evaluate(&self, log: &[TransferItem], incoming: &TransferItem) -> Verdict;
}

/// Accept every item. The log may hold several entries per identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl AcceptancePolicy for AcceptAll {
    fn evaluate(&self, _log: &[TransferItem], _incoming: &TransferItem) -> Verdict {
        Verdict::Accept
    }
}

/// Log each identity at most once.
///
/// An exact redelivery is re-acknowledged. The same identity carrying a
/// different payload is rejected with [`ErrorCode::ApplicationReject`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectDuplicates;

impl AcceptancePolicy for RejectDuplicates {
    fn evaluate(&self, log: &[TransferItem], incoming: &TransferItem) -> Verdict {
        match log.iter().find(|item| item.id == incoming.id) {
            None => Verdict::Accept,
            Some(logged) if logged.data == incoming.data => Verdict::AlreadyAccepted,
            Some(_) => Verdict::Reject(ErrorCode::ApplicationReject),
        }
    }
}
