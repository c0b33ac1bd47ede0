//! Application state, the root reducer and the running app.
//!
//! [`AppReducer`] routes every [`AppAction`] to the feature that owns it and
//! lifts the feature's effects back into `AppAction`. The store runs it
//! wrapped with the [`SessionExpiryListener`].

mod session;

pub use session::SessionExpiryListener;

use crate::api::HttpApi;
use crate::config::Config;
use crate::environment::AppEnvironment;
use crate::error::Result;
use crate::features::admin::{AdminAction, AdminReducer, AdminState};
use crate::features::auth::{self, AuthAction, AuthReducer, AuthState};
use crate::features::collection::{self, CollectionAction, CollectionReducer, CollectionState};
use crate::features::collection_items::{
    CollectionItemsAction, CollectionItemsReducer, CollectionItemsState,
};
use crate::features::collections::{CollectionsAction, CollectionsReducer, CollectionsState};
use crate::features::home::{HomeAction, HomeReducer, HomeState};
use crate::features::item::{ItemAction, ItemReducer, ItemState};
use crate::features::items::{ItemsAction, ItemsReducer, ItemsState};
use crate::features::preferences::{PreferencesAction, PreferencesReducer, PreferencesState};
use crate::features::search::{SearchAction, SearchReducer, SearchState};
use crate::i18n::Messages;
use crate::storage::FileStorage;
use catalog_core::effect::Effect;
use catalog_core::environment::KeyValueStore;
use catalog_core::reducer::Reducer;
use catalog_core::{ApiError, Lifecycle, Origin, SmallVec, WithListeners, with_listeners};
use catalog_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The whole client state, one field per feature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Session
    pub auth: AuthState,
    /// User administration
    pub admin: AdminState,
    /// The signed-in user's collections
    pub collections: CollectionsState,
    /// Collection editor
    pub collection: CollectionState,
    /// Collection page
    pub collection_items: CollectionItemsState,
    /// Item editor
    pub item: ItemState,
    /// Item page
    pub items: ItemsState,
    /// Search results
    pub search: SearchState,
    /// Home page
    pub home: HomeState,
    /// Locale, theme and topics
    pub preferences: PreferencesState,
}

impl AppState {
    /// Initial state with the session and preferences read from `storage`
    #[must_use]
    pub fn restore(storage: &dyn KeyValueStore, config: &Config) -> Self {
        Self {
            auth: auth::restore(storage),
            admin: AdminState::default(),
            collections: CollectionsState::default(),
            collection: collection::initial(),
            collection_items: CollectionItemsState::default(),
            item: ItemState::default(),
            items: ItemsState::default(),
            search: SearchState::default(),
            home: HomeState::default(),
            preferences: PreferencesState::restore(storage, config.default_locale),
        }
    }
}

/// Every action the client understands, tagged with its feature
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Session
    Auth(AuthAction),
    /// User administration
    Admin(AdminAction),
    /// The signed-in user's collections
    Collections(CollectionsAction),
    /// Collection editor
    Collection(CollectionAction),
    /// Collection page
    CollectionItems(CollectionItemsAction),
    /// Item editor
    Item(ItemAction),
    /// Item page
    Items(ItemsAction),
    /// Search
    Search(SearchAction),
    /// Home page
    Home(HomeAction),
    /// Locale, theme and topics
    Preferences(PreferencesAction),
}

impl Lifecycle for AppAction {
    fn rejection(&self) -> Option<&ApiError> {
        match self {
            Self::Auth(a) => a.rejection(),
            Self::Admin(a) => a.rejection(),
            Self::Collections(a) => a.rejection(),
            Self::Collection(a) => a.rejection(),
            Self::CollectionItems(a) => a.rejection(),
            Self::Item(a) => a.rejection(),
            Self::Items(a) => a.rejection(),
            Self::Search(a) => a.rejection(),
            Self::Home(a) => a.rejection(),
            Self::Preferences(a) => a.rejection(),
        }
    }

    fn origin(&self) -> Option<Origin> {
        match self {
            Self::Auth(a) => a.origin(),
            Self::Admin(a) => a.origin(),
            Self::Collections(a) => a.origin(),
            Self::Collection(a) => a.origin(),
            Self::CollectionItems(a) => a.origin(),
            Self::Item(a) => a.origin(),
            Self::Items(a) => a.origin(),
            Self::Search(a) => a.origin(),
            Self::Home(a) => a.origin(),
            Self::Preferences(a) => a.origin(),
        }
    }

    fn into_local(self) -> Self {
        match self {
            Self::Auth(a) => Self::Auth(a.into_local()),
            Self::Admin(a) => Self::Admin(a.into_local()),
            Self::Collections(a) => Self::Collections(a.into_local()),
            Self::Collection(a) => Self::Collection(a.into_local()),
            Self::CollectionItems(a) => Self::CollectionItems(a.into_local()),
            Self::Item(a) => Self::Item(a.into_local()),
            Self::Items(a) => Self::Items(a.into_local()),
            Self::Search(a) => Self::Search(a.into_local()),
            Self::Home(a) => Self::Home(a.into_local()),
            Self::Preferences(a) => Self::Preferences(a.into_local()),
        }
    }
}

fn lift<A, P>(effects: SmallVec<[Effect<A>; 4]>, wrap: fn(A) -> P) -> SmallVec<[Effect<P>; 4]>
where
    A: Send + 'static,
    P: Send + 'static,
{
    effects.into_iter().map(|effect| effect.map(wrap)).collect()
}

/// Root reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        match action {
            AppAction::Auth(a) => lift(AuthReducer.reduce(&mut state.auth, a, env), AppAction::Auth),
            AppAction::Admin(a) => {
                lift(AdminReducer.reduce(&mut state.admin, a, env), AppAction::Admin)
            },
            AppAction::Collections(a) => lift(
                CollectionsReducer.reduce(&mut state.collections, a, env),
                AppAction::Collections,
            ),
            AppAction::Collection(a) => lift(
                CollectionReducer.reduce(&mut state.collection, a, env),
                AppAction::Collection,
            ),
            AppAction::CollectionItems(a) => lift(
                CollectionItemsReducer.reduce(&mut state.collection_items, a, env),
                AppAction::CollectionItems,
            ),
            AppAction::Item(a) => lift(ItemReducer.reduce(&mut state.item, a, env), AppAction::Item),
            AppAction::Items(a) => {
                lift(ItemsReducer.reduce(&mut state.items, a, env), AppAction::Items)
            },
            AppAction::Search(a) => {
                lift(SearchReducer.reduce(&mut state.search, a, env), AppAction::Search)
            },
            AppAction::Home(a) => lift(HomeReducer.reduce(&mut state.home, a, env), AppAction::Home),
            AppAction::Preferences(a) => lift(
                PreferencesReducer.reduce(&mut state.preferences, a, env),
                AppAction::Preferences,
            ),
        }
    }
}

/// The store type the client runs
pub type AppStore = Store<AppState, AppAction, AppEnvironment, WithListeners<AppReducer>>;

/// Root reducer wrapped with the application listeners
#[must_use]
pub fn app_reducer() -> WithListeners<AppReducer> {
    with_listeners(AppReducer, vec![Arc::new(SessionExpiryListener)])
}

/// A running client
pub struct App {
    store: AppStore,
    config: Config,
}

impl App {
    /// Open persisted storage, connect the HTTP API and restore state
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`](crate::ClientError::Storage) when
    /// the storage file exists but cannot be read.
    pub fn bootstrap(config: Config) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::open(&config.storage_path)?);
        let api = Arc::new(HttpApi::new(config.api_url.clone(), Arc::clone(&storage)));
        let env = AppEnvironment::new(api, storage, config.comment_poll_interval);
        info!(api_url = %config.api_url, storage = %config.storage_path.display(), "Client started");
        Ok(Self::with_environment(env, config))
    }

    /// Build an app around an existing environment
    #[must_use]
    pub fn with_environment(env: AppEnvironment, config: Config) -> Self {
        let state = AppState::restore(env.storage.as_ref(), &config);
        let store_config = StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout);
        let store = Store::with_config(state, app_reducer(), env, store_config);
        Self { store, config }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// The configuration the app was built with
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Send an action without waiting for its effects
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`shutdown`](Self::shutdown).
    pub async fn send(&self, action: impl Into<AppAction>) -> Result<EffectHandle> {
        Ok(self.store.send(action.into()).await?)
    }

    /// Send an action and wait until every effect it started, and every
    /// effect those started, has finished
    ///
    /// Polling loops never settle; stop them before dispatching through
    /// here, or use [`send`](Self::send).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running after
    /// `timeout`.
    pub async fn dispatch(&self, action: impl Into<AppAction>, timeout: Duration) -> Result<()> {
        let mut handle = self.store.send(action.into()).await?;
        handle.wait_with_timeout(timeout).await?;
        self.settle(timeout).await
    }

    /// Wait until no effect is running
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running after
    /// `timeout`.
    pub async fn settle(&self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let pending = self.store.pending_effects();
            if pending == 0 {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                debug!(pending, "Effects still running");
                return Err(StoreError::Timeout.into());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Read state through a projection
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// Messages for the current locale, with topic names merged in
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Messages`](crate::ClientError::Messages) when
    /// a bundled dictionary is malformed.
    pub async fn messages(&self) -> Result<Messages> {
        let (locale, topics) = self
            .store
            .state(|s| (s.preferences.locale, s.preferences.topics.data.clone()))
            .await;
        Ok(Messages::load(locale)?.with_topics(&topics))
    }

    /// Stop accepting actions and wait for running effects
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] when effects outlive the
    /// configured shutdown timeout.
    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.store.shutdown(self.config.shutdown_timeout).await?)
    }
}

macro_rules! into_app_action {
    ($($action:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$action> for AppAction {
                fn from(action: $action) -> Self {
                    Self::$variant(action)
                }
            }
        )*
    };
}

into_app_action! {
    AuthAction => Auth,
    AdminAction => Admin,
    CollectionsAction => Collections,
    CollectionAction => Collection,
    CollectionItemsAction => CollectionItems,
    ItemAction => Item,
    ItemsAction => Items,
    SearchAction => Search,
    HomeAction => Home,
    PreferencesAction => Preferences,
}
