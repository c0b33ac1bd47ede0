//! # Catalog Testing
//!
//! Testing utilities for the catalog client's reducer architecture.
//!
//! This crate provides:
//! - In-memory implementations of environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Effect helpers that run effect descriptions without a store
//! - An [`ActionRecorder`] that captures every action a store feeds back
//!
//! ## Example
//!
//! ```ignore
//! use catalog_testing::{ActionRecorder, InMemoryStorage};
//!
//! #[tokio::test]
//! async fn login_persists_session() {
//!     let storage = Arc::new(InMemoryStorage::new());
//!     let app = App::with_environment(env_with(storage.clone()), config);
//!     let recorder = ActionRecorder::start(app.store().subscribe_actions());
//!
//!     app.send(AppAction::Auth(AuthAction::Login(credentials))).await?;
//!     // ...
//!     assert_eq!(storage.get("name").as_deref(), Some("Alice"));
//! }
//! ```

/// Given-When-Then harness for reducers
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// In-memory implementations of environment traits
pub mod mocks {
    use catalog_core::environment::{KeyValueStore, StorageError};
    use std::collections::BTreeMap;
    use std::sync::{Mutex, PoisonError};

    /// Key-value storage held in memory
    ///
    /// Stands in for the persisted file storage. Can be switched to fail
    /// every write, to exercise persistence error paths.
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_core::environment::KeyValueStore;
    /// use catalog_testing::mocks::InMemoryStorage;
    ///
    /// let storage = InMemoryStorage::new();
    /// storage.set("name", "Alice").ok();
    /// assert_eq!(storage.get("name").as_deref(), Some("Alice"));
    /// ```
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        entries: Mutex<BTreeMap<String, String>>,
        read_only: bool,
    }

    impl InMemoryStorage {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage pre-filled with entries
        #[must_use]
        pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
            let entries = entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Self {
                entries: Mutex::new(entries),
                read_only: false,
            }
        }

        /// Create storage whose writes always fail
        #[must_use]
        pub fn read_only() -> Self {
            Self {
                entries: Mutex::default(),
                read_only: true,
            }
        }

        /// Copy of everything stored
        #[must_use]
        pub fn snapshot(&self) -> BTreeMap<String, String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        fn check_writable(&self) -> Result<(), StorageError> {
            if self.read_only {
                return Err(StorageError::Io("storage is read-only".to_string()));
            }
            Ok(())
        }
    }

    impl KeyValueStore for InMemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check_writable()?;
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.check_writable()?;
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
            Ok(())
        }
    }
}

/// Run effect descriptions without a store
///
/// Reducer tests use these to see which actions an effect would feed back.
/// Delays resolve immediately.
pub mod effects {
    use catalog_core::effect::Effect;
    use futures::FutureExt;
    use futures::future::BoxFuture;

    /// Run `effect` to completion and collect the actions it produces
    ///
    /// Sequential and parallel children are collected in declaration order.
    #[must_use]
    pub fn collect_actions<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
        async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Delay { action, .. } => vec![*action],
                Effect::Future(future) => future.await.into_iter().collect(),
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(collect_actions(effect).await);
                    }
                    actions
                },
            }
        }
        .boxed()
    }

    /// Run every effect in `effects` and collect the produced actions
    pub async fn collect_all<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(collect_actions(effect).await);
        }
        actions
    }
}

/// Capture actions broadcast by a store
pub mod recorder {
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tokio::task::JoinHandle;

    /// Records every action received on a store's action broadcast
    ///
    /// The background task stops when the recorder is dropped.
    pub struct ActionRecorder<A> {
        actions: Arc<Mutex<Vec<A>>>,
        task: JoinHandle<()>,
    }

    impl<A: Clone + Send + 'static> ActionRecorder<A> {
        /// Start recording from `rx`
        #[must_use]
        pub fn start(mut rx: broadcast::Receiver<A>) -> Self {
            let actions = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&actions);

            let task = tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(action) => sink
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(action),
                        Err(broadcast::error::RecvError::Lagged(_)) => {},
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            Self { actions, task }
        }

        /// Everything recorded so far, in arrival order
        #[must_use]
        pub fn actions(&self) -> Vec<A> {
            self.actions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of recorded actions matching `predicate`
        #[must_use]
        pub fn count<F: Fn(&A) -> bool>(&self, predicate: F) -> usize {
            self.actions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter(|a| predicate(a))
                .count()
        }

        /// Poll until at least `n` recorded actions match `predicate`
        ///
        /// Returns `false` if `timeout` elapses first.
        pub async fn wait_for_count<F: Fn(&A) -> bool>(
            &self,
            predicate: F,
            n: usize,
            timeout: Duration,
        ) -> bool {
            let deadline = tokio::time::Instant::now() + timeout;
            while tokio::time::Instant::now() < deadline {
                if self.count(&predicate) >= n {
                    return true;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            self.count(&predicate) >= n
        }
    }

    impl<A> Drop for ActionRecorder<A> {
        fn drop(&mut self) {
            self.task.abort();
        }
    }
}

pub use mocks::InMemoryStorage;
pub use recorder::ActionRecorder;
