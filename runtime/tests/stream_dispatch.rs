//! Integration tests for folding action streams through the Store
//!
//! Streams are folded item by item: intermediate state is visible to readers
//! between items, and concurrent streams interleave without losing updates.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use checkout_payments_core::reducer::Reducer;
use checkout_payments_runtime::{Store, StoreError};
use futures::stream;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
struct ProgressState {
    in_flight: Option<String>,
    completed: Vec<String>,
    failed: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
enum ProgressAction {
    Requested { id: String },
    Succeeded { id: String },
    Failed { id: String },
}

struct ProgressReducer;

impl Reducer for ProgressReducer {
    type State = ProgressState;
    type Action = ProgressAction;
    type Environment = ();

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            ProgressAction::Requested { id } => state.in_flight = Some(id),
            ProgressAction::Succeeded { id } => {
                state.in_flight = None;
                state.completed.push(id);
            },
            ProgressAction::Failed { id } => {
                state.in_flight = None;
                state.failed.push(id);
            },
        }
    }
}

fn lifecycle(id: &str, succeed: bool) -> Vec<ProgressAction> {
    let id = id.to_string();
    let terminal = if succeed {
        ProgressAction::Succeeded { id: id.clone() }
    } else {
        ProgressAction::Failed { id: id.clone() }
    };
    vec![ProgressAction::Requested { id }, terminal]
}

#[tokio::test]
async fn test_dispatch_folds_stream_in_order() {
    let store = Store::new(ProgressState::default(), ProgressReducer, ());

    let state = store
        .dispatch(stream::iter(lifecycle("cc", true)))
        .await
        .unwrap();

    assert_eq!(state.in_flight, None);
    assert_eq!(state.completed, vec!["cc".to_string()]);
    assert!(state.failed.is_empty());
}

#[tokio::test]
async fn test_dispatch_empty_stream_leaves_state_untouched() {
    let store = Store::new(ProgressState::default(), ProgressReducer, ());

    let state = store.dispatch(stream::iter(Vec::new())).await.unwrap();

    assert_eq!(state, ProgressState::default());
}

#[tokio::test]
async fn test_intermediate_state_is_observable() {
    let store = Arc::new(Store::new(ProgressState::default(), ProgressReducer, ()));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let producer = async_stream::stream! {
        yield ProgressAction::Requested { id: "paypal".to_string() };
        let _ = rx.await;
        yield ProgressAction::Succeeded { id: "paypal".to_string() };
    };

    let folding = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.dispatch(producer).await })
    };

    // Wait until the Requested action has been folded
    let mut in_flight = None;
    for _ in 0..50 {
        in_flight = store.state(|s| s.in_flight.clone()).await;
        if in_flight.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(in_flight.as_deref(), Some("paypal"));

    tx.send(()).unwrap();
    let state = folding.await.unwrap().unwrap();
    assert_eq!(state.completed, vec!["paypal".to_string()]);
}

#[tokio::test]
async fn test_concurrent_streams_do_not_lose_updates() {
    let store = Arc::new(Store::new(ProgressState::default(), ProgressReducer, ()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let id = format!("method-{i}");
            store.dispatch(stream::iter(lifecycle(&id, i % 2 == 0))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (completed, failed) = store
        .state(|s| (s.completed.len(), s.failed.len()))
        .await;
    assert_eq!(completed, 10);
    assert_eq!(failed, 10);
}

#[tokio::test]
async fn test_dispatch_stops_after_shutdown() {
    let store = Store::new(ProgressState::default(), ProgressReducer, ());
    store.shutdown();

    let result = store.dispatch(stream::iter(lifecycle("cc", true))).await;

    assert_eq!(result, Err(StoreError::ShutdownInProgress));
    assert_eq!(store.snapshot().await, ProgressState::default());
}
