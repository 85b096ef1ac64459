//! Proptest generators for property-based testing.

use proptest::prelude::*;

use interledger_core::{ErrorCode, Payload, TransferId, TransferItem};

/// Generate a non-zero transfer identity.
pub fn transfer_id() -> impl Strategy<Value = TransferId> {
    (1u64..=u64::MAX).prop_map(TransferId)
}

/// Generate an identity small enough to be reached by emitting.
pub fn reachable_id() -> impl Strategy<Value = TransferId> {
    (1u64..=10_000u64).prop_map(TransferId)
}

/// Generate free-form text payloads, including unicode and the empty string.
pub fn text_payload(max_len: usize) -> impl Strategy<Value = Payload> {
    prop::collection::vec(any::<char>(), 0..=max_len)
        .prop_map(|chars| Payload::new(chars.into_iter().collect::<String>()))
}

/// Generate hex-encoded binary payloads.
pub fn binary_payload(max_len: usize) -> impl Strategy<Value = Payload> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(|bytes| Payload::from_bytes(&bytes))
}

/// Generate either kind of payload.
pub fn payload(max_len: usize) -> impl Strategy<Value = Payload> {
    prop_oneof![text_payload(max_len), binary_payload(max_len)]
}

/// Generate a rejection reason, mostly from the well-known codes.
pub fn error_code() -> impl Strategy<Value = ErrorCode> {
    prop_oneof![
        4 => (1u32..=5u32).prop_map(ErrorCode::from_code),
        1 => any::<u32>().prop_map(ErrorCode::from_code),
    ]
}

/// Generate a receiver log.
pub fn item_log(max_items: usize) -> impl Strategy<Value = Vec<TransferItem>> {
    prop::collection::vec(
        (reachable_id(), payload(64)).prop_map(|(id, data)| TransferItem::new(id, data)),
        0..=max_items,
    )
}

/// A batch of payloads to push through one sender.
#[derive(Debug, Clone)]
pub struct EmitBatch {
    pub payloads: Vec<Payload>,
}

impl Arbitrary for EmitBatch {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(payload(128), 0..=32)
            .prop_map(|payloads| EmitBatch { payloads })
            .boxed()
    }
}
