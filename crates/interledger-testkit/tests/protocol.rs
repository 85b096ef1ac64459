//! End-to-end protocol tests over in-memory ledgers.

use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;

use interledger::dispatch::{EMIT_DATA, INTERLEDGER_ABORT};
use interledger::{
    Contract, ErrorCode, Invocation, LedgerConfig, LedgerError, Payload, RecordingResolution,
    RejectDuplicates, Response, SendingEvent, TransferId, TransferItem, TransferStatus,
    UnknownOperationPolicy,
};
use interledger_core::{
    encode_items, AcceptedEvent, ProtocolEvent, ACCEPTED_EVENT, ITEMS_KEY, REJECTED_EVENT,
    SENDING_EVENT,
};
use interledger_store::Store;
use interledger_testkit::generators::{payload, EmitBatch};
use interledger_testkit::TransferPair;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn emitted_identities_are_dense(batch: EmitBatch) {
        let pair = TransferPair::new(LedgerConfig::default());
        let ids = runtime().block_on(async {
            pair.init().await;
            let mut ids = Vec::new();
            for data in batch.payloads.clone() {
                ids.push(pair.sender.emit(data).await.unwrap());
            }
            ids
        });

        let expected: Vec<TransferId> = (1..=batch.payloads.len() as u64).map(TransferId).collect();
        prop_assert_eq!(&ids, &expected);

        // One matching announcement per emit, in order
        let events = pair.sender_bus.events().unwrap();
        prop_assert_eq!(events.len(), ids.len());
        for ((event, id), data) in events.iter().zip(&ids).zip(&batch.payloads) {
            prop_assert_eq!(
                event,
                &ProtocolEvent::Sending(SendingEvent { id: *id, data: data.clone() })
            );
        }
    }

    #[test]
    fn received_log_grows_by_one(items in prop::collection::vec((1u64..=8u64, payload(32)), 0..24)) {
        let pair = TransferPair::new(LedgerConfig::default());
        let log = runtime().block_on(async {
            pair.init().await;
            for (id, data) in items.clone() {
                pair.receiver.receive(TransferId(id), data).await.unwrap();
            }
            pair.receiver.items().await.unwrap()
        });

        let expected: Vec<TransferItem> = items
            .into_iter()
            .map(|(id, data)| TransferItem::new(TransferId(id), data))
            .collect();
        prop_assert_eq!(&log, &expected);

        // Exactly one acknowledgement per receive, for the received identity
        let acknowledged: Vec<ProtocolEvent> = pair.receiver_bus.events().unwrap();
        let expected_acks: Vec<ProtocolEvent> = expected
            .iter()
            .map(|item| ProtocolEvent::Accepted(AcceptedEvent { id: item.id }))
            .collect();
        prop_assert_eq!(pair.receiver_bus.count(ACCEPTED_EVENT), expected.len());
        prop_assert_eq!(acknowledged, expected_acks);
    }
}

#[tokio::test]
async fn failing_sender_write_announces_nothing() {
    init_tracing();
    let pair = TransferPair::new(LedgerConfig::default());
    pair.init().await;
    let writes_after_init = pair.sender_store.writes();

    pair.sender_store.fail_writes(true);
    let err = pair.sender.emit(Payload::from("lost")).await.unwrap_err();

    assert!(matches!(err, LedgerError::Persistence(_)));
    assert_eq!(pair.sender_store.writes(), writes_after_init + 1);
    assert_eq!(pair.sender_store.reads(), 1);
    assert!(pair.sender_bus.is_empty());

    // The failed attempt consumed nothing
    pair.sender_store.fail_writes(false);
    assert_eq!(pair.sender.emit(Payload::from("kept")).await.unwrap(), TransferId(1));
}

#[tokio::test]
async fn failing_receiver_write_acknowledges_nothing() {
    init_tracing();
    let pair = TransferPair::new(LedgerConfig::default());
    pair.init().await;

    pair.receiver_store.fail_writes(true);
    let response = pair
        .receiver
        .invoke(&Invocation::new("interledgerReceive", ["1", "hello"]))
        .await;

    assert!(!response.is_success());
    assert!(pair.receiver_bus.is_empty());
    assert_eq!(
        pair.receiver_store.inner().get(ITEMS_KEY).await.unwrap(),
        Some(Bytes::from_static(b"[]"))
    );
}

#[tokio::test]
async fn relay_commits_every_transfer() {
    init_tracing();
    let pair = TransferPair::new(LedgerConfig::default());
    let pair = {
        let hook = RecordingResolution::new(pair.sender_store.clone());
        pair.with_hook(hook)
    };
    pair.init().await;

    for data in ["hello", "world"] {
        let response = pair.sender.invoke(&Invocation::new(EMIT_DATA, [data])).await;
        assert!(response.is_success(), "{response:?}");
    }

    let report = pair.relay().await;
    assert_eq!(report.delivered, 2);
    assert_eq!(report.committed, 2);
    assert_eq!(report.aborted, 0);
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    assert_eq!(
        pair.receiver.items().await.unwrap(),
        vec![
            TransferItem::new(TransferId(1), Payload::from("hello")),
            TransferItem::new(TransferId(2), Payload::from("world")),
        ]
    );
    for id in [TransferId(1), TransferId(2)] {
        assert_eq!(
            pair.sender.hook().status(id).await.unwrap(),
            Some(TransferStatus::Committed)
        );
    }
    assert_eq!(pair.sender.hook().status(TransferId(3)).await.unwrap(), None);
    assert_eq!(pair.sender.current_identity().await.unwrap(), TransferId(2));
}

#[tokio::test]
async fn duplicate_delivery_is_logged_twice_by_default() {
    let pair = TransferPair::new(LedgerConfig::default());
    pair.init().await;
    pair.sender.emit(Payload::from("hello")).await.unwrap();

    let report = pair.relay_with_copies(2).await;

    assert_eq!(report.delivered, 2);
    assert_eq!(pair.receiver.items().await.unwrap().len(), 2);
    assert_eq!(pair.receiver_bus.count(ACCEPTED_EVENT), 2);
    // Two acknowledgements, each relayed twice; resolve is idempotent
    assert_eq!(report.committed, 4);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn duplicate_delivery_stays_committed_under_reject_duplicates() {
    let pair = TransferPair::new(LedgerConfig::default());
    let pair = {
        let hook = RecordingResolution::new(pair.sender_store.clone());
        pair.with_hook(hook).with_policy(RejectDuplicates)
    };
    pair.init().await;
    pair.sender.emit(Payload::from("hello")).await.unwrap();

    let report = pair.relay_with_copies(2).await;

    assert_eq!(pair.receiver.items().await.unwrap().len(), 1);
    assert_eq!(pair.receiver_bus.count(ACCEPTED_EVENT), 2);
    assert_eq!(pair.receiver_bus.count(REJECTED_EVENT), 0);
    assert_eq!(report.committed, 4);
    assert_eq!(report.aborted, 0);
    assert_eq!(
        pair.sender.hook().status(TransferId(1)).await.unwrap(),
        Some(TransferStatus::Committed)
    );
}

#[tokio::test]
async fn late_redelivery_keeps_sender_and_receiver_in_agreement() {
    let pair = TransferPair::new(LedgerConfig::default());
    let pair = {
        let hook = RecordingResolution::new(pair.sender_store.clone());
        pair.with_hook(hook).with_policy(RejectDuplicates)
    };
    pair.init().await;
    pair.sender.emit(Payload::from("hello")).await.unwrap();
    pair.relay().await;
    assert_eq!(
        pair.sender.hook().status(TransferId(1)).await.unwrap(),
        Some(TransferStatus::Committed)
    );

    // The bus hands the same transfer to the receiver once more
    let response = pair
        .receiver
        .invoke(&Invocation::new("interledgerReceive", ["1", "hello"]))
        .await;
    assert!(response.is_success());
    let report = pair.relay().await;

    assert_eq!(report.committed, 1);
    assert_eq!(report.aborted, 0);
    assert_eq!(pair.receiver.items().await.unwrap().len(), 1);
    assert_eq!(
        pair.sender.hook().status(TransferId(1)).await.unwrap(),
        Some(TransferStatus::Committed)
    );
}

#[tokio::test]
async fn conflicting_payload_is_aborted_under_reject_duplicates() {
    let pair = TransferPair::new(LedgerConfig::default());
    let pair = {
        let hook = RecordingResolution::new(pair.sender_store.clone());
        pair.with_hook(hook).with_policy(RejectDuplicates)
    };
    pair.init().await;

    // A stale entry already holds identity 1
    let stale = encode_items(&[TransferItem::new(TransferId(1), Payload::from("earlier"))]).unwrap();
    pair.receiver_store.put(ITEMS_KEY, Bytes::from(stale)).await.unwrap();
    pair.sender.emit(Payload::from("hello")).await.unwrap();

    let report = pair.relay().await;

    assert_eq!(report.delivered, 1);
    assert_eq!(report.aborted, 1);
    assert_eq!(report.committed, 0);
    assert_eq!(pair.receiver.items().await.unwrap().len(), 1);
    assert_eq!(
        pair.sender.hook().status(TransferId(1)).await.unwrap(),
        Some(TransferStatus::Aborted {
            reason: ErrorCode::ApplicationReject
        })
    );
}

#[tokio::test]
async fn abort_records_reason() {
    let pair = TransferPair::new(LedgerConfig::default());
    let pair = {
        let hook = RecordingResolution::new(pair.sender_store.clone());
        pair.with_hook(hook)
    };
    pair.init().await;
    pair.sender.emit(Payload::from("x")).await.unwrap();

    let response = pair
        .sender
        .invoke(&Invocation::new(INTERLEDGER_ABORT, ["1", "1"]))
        .await;
    assert_eq!(response, Response::ok());

    let records = pair.sender.hook().records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].status,
        TransferStatus::Aborted {
            reason: ErrorCode::Timeout
        }
    );
    // Resolution leaves the sequence alone
    assert_eq!(pair.sender.current_identity().await.unwrap(), TransferId(1));
}

#[tokio::test]
async fn unknown_functions_follow_policy() {
    let lenient = TransferPair::new(LedgerConfig::default());
    lenient.init().await;
    let response = lenient
        .sender
        .invoke(&Invocation::new("transferOwnership", ["x"]))
        .await;
    assert!(response.is_success());
    assert!(lenient.sender_bus.is_empty());

    let strict = TransferPair::new(LedgerConfig {
        unknown_operations: UnknownOperationPolicy::Reject,
        ..LedgerConfig::default()
    });
    strict.init().await;
    let response = strict
        .receiver
        .invoke(&Invocation::new(EMIT_DATA, ["x"]))
        .await;
    assert!(!response.is_success());
    assert!(response.message().unwrap().contains(EMIT_DATA));
    assert_eq!(strict.sender_bus.count(SENDING_EVENT), 0);
}

#[tokio::test]
async fn config_loads_from_json() -> anyhow::Result<()> {
    let config = LedgerConfig::from_json(
        &serde_json::json!({
            "decode": "strict",
            "strict_resolve": true
        })
        .to_string(),
    )?;
    let pair = TransferPair::new(config);
    pair.init().await;

    pair.sender.emit(Payload::from("x")).await?;
    let response = pair
        .sender
        .invoke(&Invocation::new("interledgerCommit", ["2"]))
        .await;
    assert!(!response.is_success());

    let store = Arc::clone(&pair.sender_store);
    store.put("id", Bytes::from_static(b"oops")).await?;
    assert!(matches!(
        pair.sender.emit(Payload::from("y")).await,
        Err(LedgerError::Serialization(_))
    ));
    Ok(())
}
