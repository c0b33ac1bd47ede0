//! # Catalog Runtime
//!
//! Runtime for the catalog client's reducer architecture.
//!
//! This crate provides the Store that coordinates reducer execution and
//! effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the application state and executes effects
//! - **Effect Executor**: runs effect descriptions and feeds produced actions
//!   back to the reducer
//! - **Action broadcast**: every action produced by an effect is published to
//!   observers (CLI commands waiting for a result, test recorders)
//!
//! ## Example
//!
//! ```ignore
//! use catalog_runtime::Store;
//!
//! let store = Store::new(AppState::default(), reducer, environment);
//!
//! // Send an action
//! store.send(AppAction::Home(HomeAction::LoadTags { count: 20 })).await?;
//!
//! // Read state
//! let status = store.state(|s| s.home.status).await;
//! ```

use catalog_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Store errors
pub mod error {
    use thiserror::Error;

    /// Why a store call failed
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// `send()` after `shutdown()` started
        #[error("store is shutting down")]
        ShutdownInProgress,

        /// Effects still running when the shutdown timeout expired
        #[error("{0} effects still running at shutdown")]
        ShutdownTimeout(usize),

        /// Nothing matching arrived, or effects kept running, before the deadline
        #[error("timed out")]
        Timeout,

        /// The store was dropped while an observer waited
        #[error("action broadcast closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Store tuning
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(256)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for slow observers
    pub broadcast_capacity: usize,
    /// Drain timeout for callers that do not pick their own
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Replace the drain timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            default_shutdown_timeout: Duration::from_secs(10),
        }
    }
}

/// Completion of the effects started by one [`Store::send()`]
///
/// Actions those effects produce get handles of their own, so waiting here
/// does not wait for a whole request chain.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(AppAction::Auth(AuthAction::Logout)).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a handle and the tracking context its effects report to
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Wait until the effect counter reaches zero
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// [`wait`](Self::wait) with a deadline
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Counter shared by the effects of one send
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Decrements on drop, so a panicking effect still completes its handle
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Same for the store-wide count that shutdown drains
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The store and its effect executor
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreConfig, StoreError,
    };
    use tokio::sync::{broadcast, watch};

    /// Owns the client state and runs one reducer over it
    ///
    /// Reductions are serialised behind a write lock. Effects run as tokio
    /// tasks; whatever action they produce is reduced and then published to
    /// subscribers, so an observer always sees state that already includes
    /// the action it received.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        /// Flipped to `true` once on shutdown; pending delays stop waiting.
        shutdown_signal: Arc<watch::Sender<bool>>,
        pending_effects: Arc<AtomicUsize>,
        /// Every action produced by an effect is published here after the
        /// reducer has applied it.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Store with [`StoreConfig::default()`]
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Store with explicit tuning
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (shutdown_signal, _) = watch::channel(false);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                shutdown_signal: Arc::new(shutdown_signal),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Number of effects currently running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Stop accepting actions and drain running effects
        ///
        /// Pending delays (comment polling ticks) are cancelled at once;
        /// in-flight requests get up to `timeout` to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// before all pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Store shutting down");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);
            self.shutdown_signal.send_replace(true);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("Store drained");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Store did not drain in time");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(pending_effects = pending, "Draining effects");

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Reduce `action` and start its effects
        ///
        /// Returns once the effects are spawned. The [`EffectHandle`] tracks
        /// them, not the effects of the actions they produce.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
        /// down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Action rejected during shutdown");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!(effects = effects.len(), "Reduced");

                // Effect counts stay far below 2^52
                #[allow(clippy::cast_precision_loss)]
                metrics::histogram!("store.effects.count").record(effects.len() as f64);

                effects
            };

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Send `action` and wait for the first produced action matching `predicate`
        ///
        /// Subscribes to the action broadcast before sending, then returns
        /// the first effect-produced action matching `predicate`. By the time
        /// it is returned, the reducer has already applied it.
        ///
        /// ```ignore
        /// let done = store.send_and_wait_for(
        ///     AppAction::Auth(AuthAction::Login(credentials)),
        ///     |a| matches!(a, AppAction::Auth(AuthAction::Request(e)) if e.is_settled()),
        ///     Duration::from_secs(10),
        /// ).await?;
        /// ```
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before `timeout`
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to actions produced by effects
        ///
        /// The initial action passed to [`send`](Self::send) is not
        /// broadcast; only feedback actions are.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read state through a projection
        ///
        /// ```ignore
        /// let name = store.state(|s| s.auth.data.name.clone()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Feed an effect-produced action back into the store, then publish it
        async fn feed_back(&self, action: A)
        where
            R: Clone,
            E: Clone,
        {
            if let Err(error) = self.send(action.clone()).await {
                tracing::debug!(%error, "Feedback action dropped");
                return;
            }
            let _ = self.action_broadcast.send(action);
        }

        /// Spawn `work` as a tracked effect task
        fn spawn_tracked<F>(&self, tracking: &EffectTracking, work: F)
        where
            F: std::future::Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
            let guard = DecrementGuard(tracking.clone());

            tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                work.await;
            });
        }

        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into spawned tasks
        #[tracing::instrument(skip(self, effect, tracking), name = "execute_effect")]
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    let store = self.clone();
                    self.spawn_tracked(&tracking, async move {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!(?duration, "Scheduling delayed action");
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);

                    let store = self.clone();
                    let mut stopping = self.shutdown_signal.subscribe();
                    self.spawn_tracked(&tracking, async move {
                        let cancelled = async {
                            if !*stopping.borrow_and_update() {
                                let _ = stopping.changed().await;
                            }
                        };
                        tokio::select! {
                            () = tokio::time::sleep(duration) => {
                                store.feed_back(*action).await;
                            },
                            () = cancelled => {
                                tracing::trace!("Effect::Delay cancelled by shutdown");
                            },
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect_internal(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);

                    let store = self.clone();
                    self.spawn_tracked(&tracking, async move {
                        for effect in effects {
                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect_internal(effect, step_tracking);
                            step.wait().await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                shutdown_signal: Arc::clone(&self.shutdown_signal),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{SmallVec, smallvec};

    /// Like counter of a single item
    #[derive(Debug, Clone, Default)]
    struct Likes {
        count: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum LikeAction {
        Like,
        Unlike,
        Refresh,
        /// Like after the server confirmed it
        LikeRemotely,
        LikeLater(Duration),
        LikeTwiceThenUnlike,
        LikeFromEverywhere,
        /// Server call that blows up
        Crash,
        /// Server call that takes a while
        SlowLike,
    }

    #[derive(Clone)]
    struct NoEnv;

    #[derive(Clone)]
    struct LikeReducer;

    impl Reducer for LikeReducer {
        type State = Likes;
        type Action = LikeAction;
        type Environment = NoEnv;

        fn reduce(
            &self,
            state: &mut Likes,
            action: LikeAction,
            _env: &NoEnv,
        ) -> SmallVec<[Effect<LikeAction>; 4]> {
            match action {
                LikeAction::Like => state.count += 1,
                LikeAction::Unlike => state.count -= 1,
                LikeAction::Refresh => {},
                LikeAction::LikeRemotely => return smallvec![Effect::send(LikeAction::Like)],
                LikeAction::LikeLater(duration) => {
                    return smallvec![Effect::Delay {
                        duration,
                        action: Box::new(LikeAction::Like),
                    }];
                },
                LikeAction::LikeTwiceThenUnlike => {
                    return smallvec![Effect::chain(vec![
                        Effect::send(LikeAction::Like),
                        Effect::send(LikeAction::Like),
                        Effect::send(LikeAction::Unlike),
                    ])];
                },
                LikeAction::LikeFromEverywhere => {
                    return smallvec![Effect::merge(vec![
                        Effect::send(LikeAction::Like),
                        Effect::send(LikeAction::Like),
                    ])];
                },
                #[allow(clippy::panic)]
                LikeAction::Crash => {
                    return smallvec![Effect::Future(Box::pin(async {
                        panic!("server call blew up");
                    }))];
                },
                LikeAction::SlowLike => {
                    return smallvec![Effect::Future(Box::pin(async {
                        tokio::time::sleep(Duration::from_millis(300)).await;
                        Some(LikeAction::Like)
                    }))];
                },
            }
            smallvec![Effect::None]
        }
    }

    type LikeStore = Store<Likes, LikeAction, NoEnv, LikeReducer>;

    fn likes() -> LikeStore {
        Store::new(Likes::default(), LikeReducer, NoEnv)
    }

    async fn count(store: &LikeStore) -> i32 {
        store.state(|s| s.count).await
    }

    #[tokio::test]
    async fn reducer_runs_on_send() -> Result<(), StoreError> {
        let store = likes();

        store.send(LikeAction::Like).await?;
        store.send(LikeAction::Unlike).await?;
        store.send(LikeAction::Like).await?;

        assert_eq!(count(&store).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn no_effect_handle_completes_at_once() -> Result<(), StoreError> {
        let store = likes();

        let mut handle = store.send(LikeAction::Refresh).await?;
        handle.wait_with_timeout(Duration::from_millis(10)).await?;

        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn future_result_is_reduced() -> Result<(), StoreError> {
        let store = likes();

        let mut handle = store.send(LikeAction::LikeRemotely).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(count(&store).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn delay_fires_after_its_duration() -> Result<(), StoreError> {
        let store = likes();

        let mut handle = store
            .send(LikeAction::LikeLater(Duration::from_millis(20)))
            .await?;
        assert_eq!(count(&store).await, 0);

        handle.wait_with_timeout(Duration::from_secs(1)).await?;
        assert_eq!(count(&store).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn merged_effects_all_run() -> Result<(), StoreError> {
        let store = likes();

        let mut handle = store.send(LikeAction::LikeFromEverywhere).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(count(&store).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn chained_effects_keep_their_order() -> Result<(), StoreError> {
        let store = likes();
        let mut observed = store.subscribe_actions();

        let mut handle = store.send(LikeAction::LikeTwiceThenUnlike).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        let mut order = Vec::new();
        while let Ok(action) = observed.try_recv() {
            order.push(action);
        }
        assert_eq!(order, [LikeAction::Like, LikeAction::Like, LikeAction::Unlike]);
        assert_eq!(count(&store).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn panicking_effect_is_contained() -> Result<(), StoreError> {
        let store = likes();

        let mut handle = store.send(LikeAction::Crash).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;
        store.send(LikeAction::Like).await?;

        assert_eq!(count(&store).await, 1);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_state() -> Result<(), StoreError> {
        let store = likes();
        let other = store.clone();

        other.send(LikeAction::Like).await?;

        assert_eq!(count(&store).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn wait_for_returns_after_reduction() -> Result<(), StoreError> {
        let store = likes();

        let action = store
            .send_and_wait_for(
                LikeAction::LikeRemotely,
                |a| *a == LikeAction::Like,
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(action, LikeAction::Like);
        assert_eq!(count(&store).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn wait_for_gives_up_after_timeout() {
        let store = likes();

        let result = store
            .send_and_wait_for(
                LikeAction::Refresh,
                |a| *a == LikeAction::Like,
                Duration::from_millis(30),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn shutdown_rejects_later_sends() -> Result<(), StoreError> {
        let store = likes();

        store.shutdown(Duration::from_secs(1)).await?;
        store.shutdown(Duration::from_secs(1)).await?;

        let result = store.send(LikeAction::Like).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_cancels_pending_delay() -> Result<(), StoreError> {
        let store = likes();

        store
            .send(LikeAction::LikeLater(Duration::from_secs(60)))
            .await?;
        assert_eq!(store.pending_effects(), 1);

        store.shutdown(Duration::from_secs(1)).await?;

        assert_eq!(store.pending_effects(), 0);
        assert_eq!(count(&store).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_times_out_on_slow_effects() -> Result<(), StoreError> {
        let store = likes();
        store.send(LikeAction::SlowLike).await?;

        let result = store.shutdown(Duration::from_millis(50)).await;

        assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
        Ok(())
    }

    #[tokio::test]
    async fn config_is_kept() {
        let config = StoreConfig::default()
            .with_broadcast_capacity(8)
            .with_shutdown_timeout(Duration::from_secs(2));
        let store = Store::with_config(Likes::default(), LikeReducer, NoEnv, config);

        assert_eq!(store.config().broadcast_capacity, 8);
        assert_eq!(store.config().default_shutdown_timeout, Duration::from_secs(2));
    }
}
