//! # Catalog Core
//!
//! Core traits and types for the catalog client.
//!
//! The client keeps all of its state in a single store. Every change is an
//! action, every action goes through a reducer, and every side effect (HTTP
//! calls, persistence, timers) is described as an [`Effect`](effect::Effect)
//! value that the runtime executes.
//!
//! ## Core Concepts
//!
//! - **State**: plain data for one feature (a "slice")
//! - **Action**: every input a reducer can receive (user intents and request
//!   lifecycle events)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of work to run, never the work itself
//! - **Environment**: injected dependencies (API client, key-value storage)
//! - **Request lifecycle**: [`request::RequestEvent`] and
//!   [`request::AsyncSlice`] implement the pending/fulfilled/rejected status
//!   machine shared by every feature
//! - **Listeners**: cross-cutting observers that react to actions after the
//!   reducer has run ([`listener`])
//!
//! ## Example
//!
//! ```ignore
//! use catalog_core::*;
//!
//! #[derive(Clone, Debug)]
//! enum HomeAction {
//!     LoadTags { count: u32 },
//!     Request(RequestEvent<HomeOp, HomePayload>),
//! }
//!
//! impl Reducer for HomeReducer {
//!     type State = HomeState;
//!     type Action = HomeAction;
//!     type Environment = HomeEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut HomeState,
//!         action: HomeAction,
//!         env: &HomeEnvironment,
//!     ) -> SmallVec<[Effect<HomeAction>; 4]> {
//!         // ...
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// API error contract shared by every feature
pub mod error;

/// Request lifecycle types: status machine, lifecycle events, async slices
pub mod request;

/// Listener composition: observers that run after the reducer
pub mod listener;

pub use error::ApiError;
pub use listener::{Listener, WithListeners, with_listeners};
pub use request::{AsyncSlice, Lifecycle, Origin, Outcome, RequestEvent, RequestStatus, perform};

/// Reducer module - the trait every feature implements
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - all state transitions go through it
    ///
    /// # Type Parameters
    ///
    /// - `State`: the slice this reducer owns
    /// - `Action`: the actions this reducer processes
    /// - `Environment`: the injected dependencies its effects use
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for AdminReducer {
    ///     type State = AdminState;
    ///     type Action = AdminAction;
    ///     type Environment = AppEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AdminState,
    ///         action: AdminAction,
    ///         env: &AppEnvironment,
    ///     ) -> SmallVec<[Effect<AdminAction>; 4]> {
    ///         match action {
    ///             AdminAction::SetCurrentPage(page) => {
    ///                 state.current_page = page;
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Reducers mutate state in place and return effect descriptions.
        /// They must not perform I/O themselves.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned from reducers and executed by the runtime
/// store. Any action an effect produces is fed back into the store.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type effects feed back into the store
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another, each to completion
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay (polling ticks)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is dispatched.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Dispatch `action` as soon as the effect runs
        #[must_use]
        pub fn send(action: Action) -> Effect<Action> {
            Effect::Future(Box::pin(async move { Some(action) }))
        }

        /// Run a future for its side effect only
        #[must_use]
        pub fn fire_and_forget<F>(future: F) -> Effect<Action>
        where
            F: Future<Output = ()> + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                future.await;
                None
            }))
        }

        /// Lift the effect into a parent action type
        ///
        /// Feature reducers return effects over their own action enum; the
        /// application reducer wraps them with the enum variant that routes
        /// them back to the feature.
        ///
        /// ```ignore
        /// let effects = AdminReducer.reduce(&mut state.admin, action, env);
        /// effects.into_iter().map(|e| e.map(AppAction::Admin)).collect()
        /// ```
        #[must_use]
        pub fn map<Parent: Send + 'static>(self, lift: fn(Action) -> Parent) -> Effect<Parent> {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(lift)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(lift)).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(lift(*action)),
                },
                Effect::Future(future) => {
                    Effect::Future(Box::pin(async move { future.await.map(lift) }))
                },
            }
        }
    }

    impl<Action> Effect<Action> {
        /// True if the effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// External dependencies are abstracted behind traits and injected through
/// the reducer's environment, so tests can swap them for in-memory versions.
pub mod environment {
    use thiserror::Error;

    /// Errors raised by a [`KeyValueStore`]
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StorageError {
        /// Reading or writing the backing medium failed
        #[error("Storage I/O failed: {0}")]
        Io(String),

        /// The backing medium holds data that cannot be decoded
        #[error("Storage is corrupt: {0}")]
        Corrupt(String),
    }

    /// Durable client-side key-value storage
    ///
    /// Holds the session name, auth token and user preferences across runs.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - JSON file on disk
    /// let storage = FileStorage::open("~/.catalog/storage.json")?;
    ///
    /// // Test - in memory
    /// let storage = InMemoryStorage::new();
    /// storage.set("name", "Alice")?;
    /// assert_eq!(storage.get("name"), Some("Alice".to_string()));
    /// ```
    pub trait KeyValueStore: Send + Sync {
        /// Read a value, `None` when absent
        fn get(&self, key: &str) -> Option<String>;

        /// Write a value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the value cannot be persisted.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Remove a value; removing an absent key is not an error
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the removal cannot be persisted.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}
