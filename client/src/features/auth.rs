//! Session: login, registration and logout.
//!
//! The session name and token live in persisted storage. They are written
//! by the login and register effects before the fulfilled event is fed
//! back, so anything reacting to a successful login already sees them.

use crate::api::{AuthenticationResponse, LoginRequest, RegisterRequest};
use crate::environment::AppEnvironment;
use crate::storage::{keys, write_blocking};
use catalog_core::effect::Effect;
use catalog_core::environment::KeyValueStore;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, RequestStatus, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// The signed-in user, if any
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    /// Display name; `None` when signed out
    pub name: Option<String>,
}

/// Auth slice
pub type AuthState = AsyncSlice<Session>;

/// Auth slice restored from persisted storage
#[must_use]
pub fn restore(storage: &dyn KeyValueStore) -> AuthState {
    AsyncSlice::new(Session {
        name: storage.get(keys::NAME),
    })
}

/// Remote operations of the auth feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOp {
    /// `POST /users/login`
    Login,
    /// `POST /users/register`
    Register,
}

/// Auth actions
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Sign in
    Login(LoginRequest),
    /// Create an account and sign in
    Register(RegisterRequest),
    /// Forget the session, in state and in storage
    Logout,
    /// Clear status and error, keeping the session
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<AuthOp, AuthenticationResponse>),
}

request_lifecycle!(AuthAction);

async fn persist_session(storage: &Arc<dyn KeyValueStore>, session: &AuthenticationResponse) {
    let (name, token) = (session.name.clone(), session.jwt_token.clone());
    let result = write_blocking(storage, move |storage| {
        storage
            .set(keys::NAME, &name)
            .and_then(|()| storage.set(keys::TOKEN, &token))
    })
    .await;
    if let Err(error) = result {
        warn!(%error, "Failed to persist session");
    }
}

async fn clear_session(storage: &Arc<dyn KeyValueStore>) {
    let result = write_blocking(storage, |storage| {
        storage
            .remove(keys::NAME)
            .and_then(|()| storage.remove(keys::TOKEN))
    })
    .await;
    if let Err(error) = result {
        warn!(%error, "Failed to clear persisted session");
    }
}

/// Auth reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut AuthState,
        action: AuthAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AuthAction>; 4]> {
        match action {
            AuthAction::Login(credentials) => {
                state.track(&RequestEvent::<_, AuthenticationResponse>::pending(AuthOp::Login));
                let api = Arc::clone(&env.api);
                let storage = Arc::clone(&env.storage);
                smallvec![perform(
                    AuthOp::Login,
                    Origin::Global,
                    async move {
                        let session = api.login(credentials).await?;
                        persist_session(&storage, &session).await;
                        Ok(session)
                    },
                    AuthAction::Request,
                )]
            },
            AuthAction::Register(form) => {
                state.track(&RequestEvent::<_, AuthenticationResponse>::pending(AuthOp::Register));
                let api = Arc::clone(&env.api);
                let storage = Arc::clone(&env.storage);
                smallvec![perform(
                    AuthOp::Register,
                    Origin::Global,
                    async move {
                        let session = api.register(form).await?;
                        persist_session(&storage, &session).await;
                        Ok(session)
                    },
                    AuthAction::Request,
                )]
            },
            AuthAction::Logout => {
                if let Some(name) = state.data.name.take() {
                    info!(%name, "Signed out");
                }
                state.status = RequestStatus::Idle;
                state.error = None;

                let storage = Arc::clone(&env.storage);
                smallvec![Effect::fire_and_forget(async move {
                    clear_session(&storage).await;
                })]
            },
            AuthAction::Reset => {
                state.status = RequestStatus::Idle;
                state.error = None;
                smallvec![Effect::None]
            },
            AuthAction::Request(event) => {
                state.track(&event);
                if let Outcome::Fulfilled(session) = event.outcome {
                    info!(name = %session.name, "Signed in");
                    state.data.name = Some(session.name);
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Display name of the signed-in user
#[must_use]
pub fn name(state: &AuthState) -> Option<&str> {
    state.data.name.as_deref()
}

/// True when a user is signed in
#[must_use]
pub const fn is_signed_in(state: &AuthState) -> bool {
    state.data.name.is_some()
}
