//! User administration.
//!
//! Every bulk operation re-fetches the page the admin is looking at, so the
//! slice always holds one page of users.

use crate::api::{GetUsersResponse, PageRequest, UserData, UserModification};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Page shown before the admin picks one
pub const DEFAULT_CURRENT_PAGE: u32 = 1;

/// Page size used before the admin picks one
pub const DEFAULT_FETCH_COUNT: u32 = 10;

/// Admin slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminState {
    /// Page of the user table
    pub current_page: u32,
    /// Page size of the user table
    pub users_fetch_count: u32,
    /// The loaded page
    #[serde(flatten)]
    pub users: AsyncSlice<GetUsersResponse>,
}

impl Default for AdminState {
    fn default() -> Self {
        Self {
            current_page: DEFAULT_CURRENT_PAGE,
            users_fetch_count: DEFAULT_FETCH_COUNT,
            users: AsyncSlice::default(),
        }
    }
}

impl AdminState {
    const fn page(&self) -> PageRequest {
        PageRequest {
            page: self.current_page,
            count: self.users_fetch_count,
        }
    }
}

/// Remote operations of the admin feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOp {
    /// Fetch a page; `None` fields used the defaults
    Load {
        /// Requested page
        page: Option<u32>,
        /// Requested page size
        count: Option<u32>,
    },
    /// Bulk modification followed by a re-fetch
    Modify(UserModification),
    /// Bulk delete followed by a re-fetch
    Delete,
}

/// Admin actions
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    /// Fetch a page of users and remember the page and size that were given
    LoadUsers {
        /// Page to fetch, default [`DEFAULT_CURRENT_PAGE`]
        page: Option<u32>,
        /// Page size, default [`DEFAULT_FETCH_COUNT`]
        count: Option<u32>,
    },
    /// Block, unblock, promote or demote the selected users
    ModifyUsers {
        /// What to do
        modification: UserModification,
        /// Selected user ids
        ids: Vec<i64>,
    },
    /// Delete the selected users
    DeleteUsers {
        /// Selected user ids
        ids: Vec<i64>,
    },
    /// Remember the current page
    SetCurrentPage(u32),
    /// Remember the page size
    SetFetchCount(u32),
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<AdminOp, GetUsersResponse>),
}

request_lifecycle!(AdminAction);

/// Admin reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminReducer;

impl AdminReducer {
    fn start<F>(state: &mut AdminState, op: AdminOp, call: F) -> SmallVec<[Effect<AdminAction>; 4]>
    where
        F: std::future::Future<Output = Result<GetUsersResponse, catalog_core::ApiError>>
            + Send
            + 'static,
    {
        state
            .users
            .track(&RequestEvent::<_, GetUsersResponse>::pending(op.clone()));
        smallvec![perform(op, Origin::Global, call, AdminAction::Request)]
    }
}

impl Reducer for AdminReducer {
    type State = AdminState;
    type Action = AdminAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut AdminState,
        action: AdminAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AdminAction>; 4]> {
        match action {
            AdminAction::LoadUsers { page, count } => {
                let api = Arc::clone(&env.api);
                let request = PageRequest {
                    page: page.unwrap_or(DEFAULT_CURRENT_PAGE),
                    count: count.unwrap_or(DEFAULT_FETCH_COUNT),
                };
                Self::start(state, AdminOp::Load { page, count }, async move {
                    api.get_users(request).await
                })
            },
            AdminAction::ModifyUsers { modification, ids } => {
                let api = Arc::clone(&env.api);
                let page = state.page();
                Self::start(state, AdminOp::Modify(modification), async move {
                    api.modify_users(modification, ids).await?;
                    api.get_users(page).await
                })
            },
            AdminAction::DeleteUsers { ids } => {
                let api = Arc::clone(&env.api);
                let page = state.page();
                Self::start(state, AdminOp::Delete, async move {
                    api.delete_users(ids).await?;
                    api.get_users(page).await
                })
            },
            AdminAction::SetCurrentPage(page) => {
                state.current_page = page;
                smallvec![Effect::None]
            },
            AdminAction::SetFetchCount(count) => {
                state.users_fetch_count = count;
                smallvec![Effect::None]
            },
            AdminAction::Reset => {
                *state = AdminState::default();
                smallvec![Effect::None]
            },
            AdminAction::Request(event) => {
                state.users.track(&event);
                if let Outcome::Fulfilled(payload) = event.outcome {
                    if let AdminOp::Load { page, count } = event.op {
                        if let Some(page) = page {
                            state.current_page = page;
                        }
                        if let Some(count) = count {
                            state.users_fetch_count = count;
                        }
                    }
                    state.users.data = payload;
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Users on the loaded page
#[must_use]
pub fn users(state: &AdminState) -> &[UserData] {
    &state.users.data.users
}

/// Number of pages at the current page size
#[must_use]
pub const fn pages_count(state: &AdminState) -> u32 {
    state.users.data.pages_count
}

/// Total number of users
#[must_use]
pub const fn users_count(state: &AdminState) -> u64 {
    state.users.data.users_count
}
