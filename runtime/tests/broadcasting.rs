//! Integration tests for Store action broadcasting
//!
//! Covers the observation features the client's CLI and test recorders rely
//! on: waiting for the settled event of a request, subscribing to feedback
//! actions, and stopping a self-rescheduling poll by generation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use catalog_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use catalog_runtime::{Store, StoreConfig, StoreError};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start a fake request with a correlation id
    Load { id: u64, fail: bool },
    /// Request succeeded (terminal)
    Loaded { id: u64 },
    /// Request failed (terminal)
    Failed { id: u64 },
    /// Start polling
    StartPolling,
    /// Poll tick for one polling generation
    Tick { generation: u64 },
    /// Stop polling
    StopPolling,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    loaded: Vec<u64>,
    failed: Vec<u64>,
    generation: u64,
    polling: bool,
    ticks: u32,
}

#[derive(Clone)]
struct TestEnvironment {
    poll_interval: Duration,
}

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Load { id, fail } => smallvec![Effect::Future(Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(5 * (id % 3))).await;
                Some(if fail {
                    TestAction::Failed { id }
                } else {
                    TestAction::Loaded { id }
                })
            }))],
            TestAction::Loaded { id } => {
                state.loaded.push(id);
                smallvec![Effect::None]
            },
            TestAction::Failed { id } => {
                state.failed.push(id);
                smallvec![Effect::None]
            },
            TestAction::StartPolling => {
                state.generation += 1;
                state.polling = true;
                smallvec![Effect::Delay {
                    duration: env.poll_interval,
                    action: Box::new(TestAction::Tick {
                        generation: state.generation
                    }),
                }]
            },
            TestAction::Tick { generation } => {
                if !state.polling || generation != state.generation {
                    return smallvec![Effect::None];
                }
                state.ticks += 1;
                smallvec![Effect::Delay {
                    duration: env.poll_interval,
                    action: Box::new(TestAction::Tick { generation }),
                }]
            },
            TestAction::StopPolling => {
                state.polling = false;
                state.generation += 1;
                smallvec![Effect::None]
            },
        }
    }
}

fn store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(
        TestState::default(),
        TestReducer,
        TestEnvironment {
            poll_interval: Duration::from_millis(10),
        },
    )
}

// ============================================================================
// Tests
// ============================================================================

/// The settled action is returned after the reducer applied it
#[tokio::test]
async fn test_send_and_wait_for_settled_request() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Load { id: 7, fail: false },
            |a| matches!(a, TestAction::Loaded { id: 7 } | TestAction::Failed { id: 7 }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Loaded { id: 7 });
    assert_eq!(store.state(|s| s.loaded.clone()).await, vec![7]);
}

/// A failure is just another terminal action
#[tokio::test]
async fn test_send_and_wait_for_failure() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Load { id: 2, fail: true },
            |a| matches!(a, TestAction::Loaded { id: 2 } | TestAction::Failed { id: 2 }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Failed { id: 2 });
    assert_eq!(store.state(|s| s.failed.len()).await, 1);
}

/// Concurrent requests each get their own terminal action
#[tokio::test]
async fn test_correlation_id_filtering() {
    let store = Arc::new(store());

    let handles: Vec<_> = (1..=5)
        .map(|id| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .send_and_wait_for(
                        TestAction::Load { id, fail: false },
                        move |a| matches!(a, TestAction::Loaded { id: done } if *done == id),
                        Duration::from_secs(2),
                    )
                    .await
            })
        })
        .collect();

    for (idx, handle) in handles.into_iter().enumerate() {
        let id = idx as u64 + 1;
        let result = handle.await.expect("task panicked");
        assert_eq!(result.unwrap(), TestAction::Loaded { id });
    }

    let mut loaded = store.state(|s| s.loaded.clone()).await;
    loaded.sort_unstable();
    assert_eq!(loaded, vec![1, 2, 3, 4, 5]);
}

/// The initial action is not broadcast, only feedback actions are
#[tokio::test]
async fn test_initial_action_not_broadcast() {
    let store = store();
    let mut rx = store.subscribe_actions();

    let mut handle = store.send(TestAction::Load { id: 3, fail: false }).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(rx.try_recv().unwrap(), TestAction::Loaded { id: 3 });
    assert!(rx.try_recv().is_err());
}

/// Stopping polling strands the pending tick of the old generation
#[tokio::test]
async fn test_polling_stops_by_generation() {
    let store = store();

    store.send(TestAction::StartPolling).await.unwrap();
    tokio::time::sleep(Duration::from_millis(55)).await;
    store.send(TestAction::StopPolling).await.unwrap();

    let ticks = store.state(|s| s.ticks).await;
    assert!(ticks >= 2, "expected a few ticks, got {ticks}");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.state(|s| s.ticks).await, ticks);
    assert_eq!(store.pending_effects(), 0);
}

/// Shutdown does not wait out a polling interval
#[tokio::test]
async fn test_shutdown_cancels_polling() {
    let store = Store::with_config(
        TestState::default(),
        TestReducer,
        TestEnvironment {
            poll_interval: Duration::from_secs(30),
        },
        StoreConfig::default().with_shutdown_timeout(Duration::from_millis(200)),
    );

    store.send(TestAction::StartPolling).await.unwrap();
    let timeout = store.config().default_shutdown_timeout;
    store.shutdown(timeout).await.unwrap();

    assert!(matches!(
        store.send(TestAction::StopPolling).await,
        Err(StoreError::ShutdownInProgress)
    ));
}

/// Slow subscribers lag without blocking the store
#[tokio::test]
async fn test_lagging_subscriber() {
    let store = Store::with_config(
        TestState::default(),
        TestReducer,
        TestEnvironment {
            poll_interval: Duration::from_millis(10),
        },
        StoreConfig::default().with_broadcast_capacity(4),
    );

    let mut rx = store.subscribe_actions();

    for id in 0..20 {
        let mut handle = store.send(TestAction::Load { id: id * 3, fail: false }).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
    }

    let mut received = 0;
    let mut lagged = false;
    loop {
        match rx.try_recv() {
            Ok(_) => received += 1,
            Err(tokio::sync::broadcast::error::TryRecvError::Lagged(_)) => lagged = true,
            Err(_) => break,
        }
    }

    assert!(lagged, "expected subscriber to lag");
    assert_eq!(received, 4);
    assert_eq!(store.state(|s| s.loaded.len()).await, 20);
}
