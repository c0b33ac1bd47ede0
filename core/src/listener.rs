//! Listener composition
//!
//! A listener observes actions after the reducer has applied them and may
//! return extra effects. It never mutates state directly: anything it wants
//! to change goes back through the store as an action.
//!
//! [`with_listeners`] wraps a reducer so the runtime sees one reducer:
//!
//! ```ignore
//! let reducer = with_listeners(AppReducer, vec![Arc::new(SessionExpiryListener)]);
//! let store = Store::new(AppState::default(), reducer, env);
//! ```

use crate::SmallVec;
use crate::effect::Effect;
use crate::reducer::Reducer;
use std::sync::Arc;

/// Observer that reacts to actions after the reducer
///
/// # Type Parameters
///
/// - `A`: the action type observed
/// - `E`: the environment the reducer runs with
pub trait Listener<A, E>: Send + Sync {
    /// Whether this listener cares about `action`
    fn matches(&self, action: &A) -> bool;

    /// Effects to run for a matching action
    ///
    /// Only called when [`matches`](Listener::matches) returned `true`.
    fn effects(&self, action: &A, env: &E) -> SmallVec<[Effect<A>; 4]>;
}

/// A reducer followed by a set of listeners
///
/// Created by [`with_listeners`].
pub struct WithListeners<R>
where
    R: Reducer,
{
    reducer: R,
    listeners: Vec<Arc<dyn Listener<R::Action, R::Environment>>>,
}

impl<R> Clone for WithListeners<R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

/// Wrap `reducer` so `listeners` run after every action it reduces
///
/// Listener effects are appended after the reducer's own effects, in the
/// order the listeners were given.
#[must_use]
pub fn with_listeners<R>(
    reducer: R,
    listeners: Vec<Arc<dyn Listener<R::Action, R::Environment>>>,
) -> WithListeners<R>
where
    R: Reducer,
{
    WithListeners { reducer, listeners }
}

impl<R> Reducer for WithListeners<R>
where
    R: Reducer,
    R::Action: Clone,
{
    type State = R::State;
    type Action = R::Action;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let observed = self
            .listeners
            .iter()
            .any(|listener| listener.matches(&action))
            .then(|| action.clone());

        let mut effects = self.reducer.reduce(state, action, env);

        if let Some(action) = observed {
            for listener in self.listeners.iter().filter(|l| l.matches(&action)) {
                effects.extend(listener.effects(&action, env));
            }
        }

        effects
    }
}
