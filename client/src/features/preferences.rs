//! Locale, theme and the topic list.
//!
//! Locale and theme are persisted on change and restored at startup.

use crate::api::TopicData;
use crate::environment::AppEnvironment;
use crate::i18n::{Locale, ThemeMode};
use crate::storage::{keys, write_blocking};
use catalog_core::effect::Effect;
use catalog_core::environment::KeyValueStore;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Preferences slice
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PreferencesState {
    /// Interface language
    pub locale: Locale,
    /// Color theme
    pub theme: ThemeMode,
    /// Topics a collection can belong to
    pub topics: AsyncSlice<Vec<TopicData>>,
}

impl PreferencesState {
    /// Preferences restored from persisted storage
    ///
    /// Missing or unreadable values fall back to `default_locale` and the
    /// light theme.
    #[must_use]
    pub fn restore(storage: &dyn KeyValueStore, default_locale: Locale) -> Self {
        let locale = storage
            .get(keys::LOCALE)
            .and_then(|code| code.parse().ok())
            .unwrap_or(default_locale);
        let theme = storage
            .get(keys::THEME)
            .and_then(|mode| mode.parse().ok())
            .unwrap_or_default();
        Self {
            locale,
            theme,
            topics: AsyncSlice::default(),
        }
    }
}

/// Remote operations of the preferences feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesOp {
    /// `GET /collections/topics`
    LoadTopics,
}

/// Preferences actions
#[derive(Debug, Clone, PartialEq)]
pub enum PreferencesAction {
    /// Switch the interface language
    SetLocale(Locale),
    /// Switch between light and dark
    ToggleTheme,
    /// Load the topic list
    LoadTopics,
    /// Lifecycle of a remote operation
    Request(RequestEvent<PreferencesOp, Vec<TopicData>>),
}

request_lifecycle!(PreferencesAction);

fn persist(env: &AppEnvironment, key: &'static str, value: String) -> Effect<PreferencesAction> {
    let storage = Arc::clone(&env.storage);
    Effect::fire_and_forget(async move {
        if let Err(error) = write_blocking(&storage, move |s| s.set(key, &value)).await {
            warn!(%error, key, "Failed to persist preference");
        }
    })
}

/// Preferences reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferencesReducer;

impl Reducer for PreferencesReducer {
    type State = PreferencesState;
    type Action = PreferencesAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut PreferencesState,
        action: PreferencesAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<PreferencesAction>; 4]> {
        match action {
            PreferencesAction::SetLocale(locale) => {
                state.locale = locale;
                smallvec![persist(env, keys::LOCALE, locale.code().to_string())]
            },
            PreferencesAction::ToggleTheme => {
                state.theme = state.theme.toggled();
                smallvec![persist(env, keys::THEME, state.theme.as_str().to_string())]
            },
            PreferencesAction::LoadTopics => {
                state
                    .topics
                    .track(&RequestEvent::<_, Vec<TopicData>>::pending(PreferencesOp::LoadTopics));
                let api = Arc::clone(&env.api);
                smallvec![perform(
                    PreferencesOp::LoadTopics,
                    Origin::Global,
                    async move { api.topics().await },
                    PreferencesAction::Request,
                )]
            },
            PreferencesAction::Request(event) => {
                state.topics.track(&event);
                if let Outcome::Fulfilled(topics) = event.outcome {
                    state.topics.data = topics;
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Loaded topics
#[must_use]
pub fn topics(state: &PreferencesState) -> &[TopicData] {
    &state.topics.data
}
