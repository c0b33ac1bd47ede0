//! Given-When-Then testing for feature reducers
//!
//! A feature reducer mutates its slice and describes effects. [`ReducerTest`]
//! replays a short history of actions, reduces the action under test and
//! checks the slice and the effects it returned. Slices start from their
//! `Default` unless a state is given.

#![allow(clippy::module_name_repetitions)]

use catalog_core::{effect::Effect, reducer::Reducer};

type SliceCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent Given-When-Then runner for one reducer call
///
/// ```ignore
/// use catalog_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(AdminReducer)
///     .with_env(test_environment())
///     .when_action(AdminAction::SetCurrentPage(3))
///     .then_state(|admin| assert_eq!(admin.current_page, 3))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    env: Option<R::Environment>,
    state: R::State,
    history: Vec<R::Action>,
    action: Option<R::Action>,
    slice_checks: Vec<SliceCheck<R::State>>,
    effect_checks: Vec<EffectCheck<R::Action>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
    R::State: Default,
{
    /// Start a test for `reducer` from the default slice
    #[must_use]
    pub fn new(reducer: R) -> Self {
        Self::starting_from(reducer, R::State::default())
    }
}

impl<R: Reducer> ReducerTest<R> {
    /// Start a test for `reducer` from `state`
    #[must_use]
    pub const fn starting_from(reducer: R, state: R::State) -> Self {
        Self {
            reducer,
            env: None,
            state,
            history: Vec::new(),
            action: None,
            slice_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment handed to every reduction
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Slice to start from (Given)
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.state = state;
        self
    }

    /// Actions reduced before the one under test, effects discarded (Given)
    #[must_use]
    pub fn given_actions(mut self, actions: impl IntoIterator<Item = R::Action>) -> Self {
        self.history.extend(actions);
        self
    }

    /// The action under test (When)
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Check the slice after the action (Then)
    #[must_use]
    pub fn then_state(mut self, check: impl FnOnce(&R::State) + 'static) -> Self {
        self.slice_checks.push(Box::new(check));
        self
    }

    /// Check the effects the action returned (Then)
    #[must_use]
    pub fn then_effects(mut self, check: impl FnOnce(&[Effect<R::Action>]) + 'static) -> Self {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Reduce, run every check and hand back the final slice
    ///
    /// # Panics
    ///
    /// Panics when no environment or action was set, or when a check fails.
    #[allow(clippy::expect_used)]
    pub fn run(self) -> R::State {
        let env = self.env.expect("call with_env() before run()");
        let action = self.action.expect("call when_action() before run()");
        let mut state = self.state;

        for earlier in self.history {
            drop(self.reducer.reduce(&mut state, earlier, &env));
        }
        let effects = self.reducer.reduce(&mut state, action, &env);

        self.slice_checks.into_iter().for_each(|check| check(&state));
        self.effect_checks.into_iter().for_each(|check| check(&effects));
        state
    }
}

/// Checks over returned effects
///
/// Searches look through `Parallel` and `Sequential` groups, so a reducer may
/// wrap its work in either without breaking a test.
pub mod assertions {
    use catalog_core::effect::Effect;

    fn any<A>(effects: &[Effect<A>], found: &dyn Fn(&Effect<A>) -> bool) -> bool {
        effects.iter().any(|effect| match effect {
            Effect::Parallel(group) | Effect::Sequential(group) => any(group, found),
            other => found(other),
        })
    }

    /// The reducer only changed its slice
    ///
    /// # Panics
    ///
    /// Panics if any effect would do work.
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "expected a pure state change, got {effects:?}"
        );
    }

    /// Exactly `expected` top-level effects
    ///
    /// # Panics
    ///
    /// Panics on any other count.
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "unexpected number of effects");
    }

    /// A request or other future was started
    ///
    /// # Panics
    ///
    /// Panics if no future effect is found.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            any(effects, &|e| matches!(e, Effect::Future(_))),
            "expected a future effect"
        );
    }

    /// A delayed action was scheduled
    ///
    /// # Panics
    ///
    /// Panics if no delay effect is found.
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            any(effects, &|e| matches!(e, Effect::Delay { .. })),
            "expected a delay effect"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{SmallVec, smallvec};
    use std::time::Duration;

    /// Tags typed into a form
    #[derive(Debug, Default)]
    struct Draft {
        tags: Vec<String>,
    }

    #[derive(Debug)]
    enum DraftAction {
        Add(&'static str),
        Remove(&'static str),
        /// Save once the user stops typing
        SaveSoon,
    }

    struct DraftReducer;

    impl Reducer for DraftReducer {
        type State = Draft;
        type Action = DraftAction;
        type Environment = ();

        fn reduce(
            &self,
            draft: &mut Draft,
            action: DraftAction,
            _env: &(),
        ) -> SmallVec<[Effect<DraftAction>; 4]> {
            match action {
                DraftAction::Add(tag) => draft.tags.push(tag.to_string()),
                DraftAction::Remove(tag) => draft.tags.retain(|t| t != tag),
                DraftAction::SaveSoon => {
                    return smallvec![Effect::chain(vec![Effect::Delay {
                        duration: Duration::from_millis(300),
                        action: Box::new(DraftAction::Add("saved")),
                    }])];
                },
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn starts_from_the_default_slice() {
        let draft = ReducerTest::new(DraftReducer)
            .with_env(())
            .when_action(DraftAction::Add("red"))
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(draft.tags, ["red"]);
    }

    #[test]
    fn history_is_replayed_first() {
        ReducerTest::new(DraftReducer)
            .with_env(())
            .given_state(Draft {
                tags: vec!["old".to_string()],
            })
            .given_actions([DraftAction::Add("red"), DraftAction::Add("blue")])
            .when_action(DraftAction::Remove("red"))
            .then_state(|draft| assert_eq!(draft.tags, ["old", "blue"]))
            .run();
    }

    #[test]
    fn nested_delay_is_found() {
        ReducerTest::new(DraftReducer)
            .with_env(())
            .when_action(DraftAction::SaveSoon)
            .then_state(|draft| assert!(draft.tags.is_empty()))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }
}
