//! Tests for invocation dispatch
//!
//! Exercises routing by function name, argument-count handling and the
//! degraded submit modes.

use super::{Contract, functions};
use crate::{
    ErrorKind, Receipt, ReceiptStatus, Timestamp, ValidationError,
    config::ValidationConfig,
    context::Invocation,
    state::{StateCache, StateStore},
};
use chrono::DateTime;

const NOW: i64 = 1_700_000_000;

fn now() -> Timestamp {
    DateTime::from_timestamp(NOW, 0).unwrap()
}

fn call(function: &str, args: &[&str]) -> Invocation {
    Invocation::new(function, args, Some(NOW))
}

async fn registered(contract: &Contract) -> StateCache {
    let store = StateCache::new();
    contract
        .invoke(&store, &call(functions::UPDATE_NODE_REPUTATION, &["node1", "50"]), now())
        .await
        .unwrap();
    store
}

#[test]
fn test_init_has_no_side_effects() {
    let contract = Contract::new(&ValidationConfig::default());
    assert!(contract.init().is_ok());
}

#[tokio::test]
async fn test_register_submit_and_query() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = registered(&contract).await;

    let result = contract
        .invoke(&store, &call(functions::SUBMIT_TRANSACTION, &["k1", "10", "30", "node1"]), now())
        .await;
    assert!(matches!(result, Ok(None)));

    let value = contract
        .invoke(&store, &call(functions::GET_STATE, &["k1"]), now())
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("10"));

    let node = contract
        .invoke(&store, &call(functions::GET_NODE_REPUTATION, &["node1"]), now())
        .await
        .unwrap();
    assert_eq!(node.as_deref(), Some(r#"{"ID":"node1","Reputation":50}"#));
}

#[tokio::test]
async fn test_set_reputation_alias() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = StateCache::new();

    contract
        .invoke(&store, &call(functions::SET_REPUTATION, &["node9", "4"]), now())
        .await
        .unwrap();
    assert!(store.get("node~node9").await.unwrap().is_some());
}

#[tokio::test]
async fn test_get_state_of_missing_key_is_empty() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = StateCache::new();

    let value = contract
        .invoke(&store, &call(functions::GET_STATE, &["nothing"]), now())
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_argument_counts_are_enforced() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = registered(&contract).await;

    let cases = [
        (functions::SUBMIT_TRANSACTION, vec!["k1", "10"], 4),
        (functions::SUBMIT_TRANSACTION, vec!["k1", "10", "1", "node1", "x"], 4),
        (functions::UPDATE_NODE_REPUTATION, vec!["node1"], 2),
        (functions::SUBMIT_UNCHECKED_TRANSACTION, vec!["k1"], 2),
        (functions::GET_STATE, vec![], 1),
    ];
    for (function, args, want) in cases {
        let err = contract
            .invoke(&store, &call(function, &args), now())
            .await
            .unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidArgumentCount { expected, .. } if expected == want),
            "{function}: {err}"
        );
    }
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_unknown_function() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = StateCache::new();

    let err = contract
        .invoke(&store, &call("deleteState", &["k1"]), now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);
}

#[tokio::test]
async fn test_missing_timestamp_rejects_writes_only() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = registered(&contract).await;

    let unstamped = Invocation::new(functions::SUBMIT_TRANSACTION, &["k1", "1", "1", "node1"], None);
    let err = contract.invoke(&store, &unstamped, now()).await.unwrap_err();
    assert!(matches!(err, ValidationError::TimestampUnavailable));

    let registration = Invocation::new(functions::UPDATE_NODE_REPUTATION, &["node2", "1"], None);
    assert!(contract.invoke(&store, &registration, now()).await.is_ok());
}

#[tokio::test]
async fn test_unchecked_submit_can_be_disabled() {
    let config = ValidationConfig {
        allow_unchecked_submit: false,
        ..ValidationConfig::default()
    };
    let contract = Contract::new(&config);
    let store = StateCache::new();

    let err = contract
        .invoke(&store, &call(functions::SUBMIT_UNCHECKED_TRANSACTION, &["k1", "1"]), now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FunctionDisabled);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_legacy_two_arg_submit() {
    let config = ValidationConfig {
        legacy_two_arg_submit: true,
        ..ValidationConfig::default()
    };
    let contract = Contract::new(&config);
    let store = StateCache::new();

    contract
        .invoke(&store, &call(functions::SUBMIT_TRANSACTION, &["k1", "8"]), now())
        .await
        .unwrap();
    assert_eq!(store.get("k1").await.unwrap(), Some(b"8".to_vec()));

    // The four-argument form still goes through the reputation check
    let err = contract
        .invoke(&store, &call(functions::SUBMIT_TRANSACTION, &["k1", "9", "1", "node1"]), now())
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::UnregisteredNode(_)));
}

#[tokio::test]
async fn test_receipt_for_stale_transaction() {
    let contract = Contract::new(&ValidationConfig::default());
    let store = registered(&contract).await;

    let stale = Invocation::new(
        functions::SUBMIT_TRANSACTION,
        &["k1", "10", "30", "node1"],
        Some(NOW - 90),
    );
    let result = contract.invoke(&store, &stale, now()).await;
    let receipt = Receipt::new(&stale.function, &result, now());

    match receipt.status {
        ReceiptStatus::Rejected { kind, .. } => assert_eq!(kind, ErrorKind::StaleTransaction),
        ReceiptStatus::Applied => panic!("stale transaction was applied"),
    }
    assert_eq!(store.get("k1").await.unwrap(), None);
}

#[tokio::test]
async fn test_legacy_two_arg_submit_respects_unchecked_switch() {
    let config = ValidationConfig {
        allow_unchecked_submit: false,
        legacy_two_arg_submit: true,
        ..ValidationConfig::default()
    };
    let contract = Contract::new(&config);
    let store = StateCache::new();

    let err = contract
        .invoke(&store, &call(functions::SUBMIT_TRANSACTION, &["k1", "8"]), now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FunctionDisabled);
    assert_eq!(store.get("k1").await.unwrap(), None);
}
