//! Item page: item details, comments, likes and comment polling.
//!
//! While an item page is open its comments are re-fetched on a fixed
//! interval. Each tick is a [`Effect::Delay`] carrying the polling
//! generation it was scheduled under; stopping or resetting bumps the
//! generation so ticks already in flight are ignored when they arrive.
//! Polled fetches are tagged [`Origin::Local`] and never show a loading
//! state.

use crate::api::{CommentData, CreateCommentRequest, GetItemResponse};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{
    AsyncSlice, ApiError, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Data of the item page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ItemDetails {
    /// Item without its comments
    pub item: GetItemResponse,
    /// Comments, oldest first
    pub comments: Vec<CommentData>,
}

/// Comment polling bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommentPolling {
    /// Bumped on every start, stop and reset
    pub generation: u64,
    /// True between start and stop
    pub active: bool,
}

/// Items slice
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ItemsState {
    /// Loaded item
    #[serde(flatten)]
    pub details: AsyncSlice<ItemDetails>,
    /// Comment polling
    pub polling: CommentPolling,
}

/// Remote operations of the items feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsOp {
    /// `GET /items/{id}`
    Load(i64),
    /// `POST /items/{id}`
    CreateComment(i64),
    /// `GET /items/{id}/comments`
    LoadComments(i64),
    /// `POST /items/{id}/like`
    Like(i64),
    /// `POST /items/{id}/unlike`
    Unlike(i64),
}

/// Payloads of the items feature
#[derive(Debug, Clone, PartialEq)]
pub enum ItemsPayload {
    /// The item with its comments
    Item(GetItemResponse),
    /// The stored comment
    Comment(CommentData),
    /// Every comment
    Comments(Vec<CommentData>),
    /// Like or unlike went through
    Done,
}

/// Items actions
#[derive(Debug, Clone, PartialEq)]
pub enum ItemsAction {
    /// Load an item with its comments
    Load(i64),
    /// Post a comment
    CreateComment {
        /// Commented item
        item_id: i64,
        /// Comment text
        text: String,
    },
    /// Re-fetch the comments in the background
    LoadComments(i64),
    /// Like the item
    Like(i64),
    /// Withdraw the like
    Unlike(i64),
    /// Like or unlike depending on the current state
    LikeOrUnlike(i64),
    /// Start re-fetching comments every poll interval
    StartCommentPolling(i64),
    /// One polling tick
    PollComments {
        /// Polled item
        item_id: i64,
        /// Generation the tick was scheduled under
        generation: u64,
    },
    /// Stop polling; ticks in flight are dropped
    StopCommentPolling,
    /// Back to the initial state; stops polling
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<ItemsOp, ItemsPayload>),
}

request_lifecycle!(ItemsAction);

/// Items reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemsReducer;

impl ItemsReducer {
    fn start<F>(
        state: &mut ItemsState,
        op: ItemsOp,
        origin: Origin,
        call: F,
    ) -> SmallVec<[Effect<ItemsAction>; 4]>
    where
        F: std::future::Future<Output = Result<ItemsPayload, ApiError>> + Send + 'static,
    {
        let pending = RequestEvent::<_, ItemsPayload> {
            op,
            origin,
            outcome: Outcome::Pending,
        };
        state.details.track(&pending);
        smallvec![perform(op, origin, call, ItemsAction::Request)]
    }

    fn fetch_comments(state: &mut ItemsState, item_id: i64, env: &AppEnvironment) -> SmallVec<[Effect<ItemsAction>; 4]> {
        let api = Arc::clone(&env.api);
        Self::start(state, ItemsOp::LoadComments(item_id), Origin::Local, async move {
            api.get_comments(item_id)
                .await
                .map(|response| ItemsPayload::Comments(response.comments))
        })
    }

    fn schedule_tick(state: &ItemsState, item_id: i64, env: &AppEnvironment) -> Effect<ItemsAction> {
        Effect::Delay {
            duration: env.comment_poll_interval,
            action: Box::new(ItemsAction::PollComments {
                item_id,
                generation: state.polling.generation,
            }),
        }
    }
}

impl Reducer for ItemsReducer {
    type State = ItemsState;
    type Action = ItemsAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut ItemsState,
        action: ItemsAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<ItemsAction>; 4]> {
        match action {
            ItemsAction::Load(id) => {
                let api = Arc::clone(&env.api);
                Self::start(state, ItemsOp::Load(id), Origin::Global, async move {
                    api.get_item(id).await.map(ItemsPayload::Item)
                })
            },
            ItemsAction::CreateComment { item_id, text } => {
                let api = Arc::clone(&env.api);
                let op = ItemsOp::CreateComment(item_id);
                Self::start(state, op, Origin::Global, async move {
                    api.create_comment(item_id, CreateCommentRequest { text })
                        .await
                        .map(|response| ItemsPayload::Comment(response.comment))
                })
            },
            ItemsAction::LoadComments(item_id) => Self::fetch_comments(state, item_id, env),
            ItemsAction::Like(id) => {
                let api = Arc::clone(&env.api);
                Self::start(state, ItemsOp::Like(id), Origin::Global, async move {
                    api.like(id).await.map(|()| ItemsPayload::Done)
                })
            },
            ItemsAction::Unlike(id) => {
                let api = Arc::clone(&env.api);
                Self::start(state, ItemsOp::Unlike(id), Origin::Global, async move {
                    api.unlike(id).await.map(|()| ItemsPayload::Done)
                })
            },
            ItemsAction::LikeOrUnlike(id) => {
                let next = if state.details.data.item.like {
                    ItemsAction::Unlike(id)
                } else {
                    ItemsAction::Like(id)
                };
                self.reduce(state, next, env)
            },
            ItemsAction::StartCommentPolling(item_id) => {
                state.polling.generation += 1;
                state.polling.active = true;
                debug!(item_id, generation = state.polling.generation, "Comment polling started");
                smallvec![Self::schedule_tick(state, item_id, env)]
            },
            ItemsAction::PollComments {
                item_id,
                generation,
            } => {
                if !state.polling.active || generation != state.polling.generation {
                    debug!(item_id, generation, "Stale polling tick dropped");
                    return smallvec![Effect::None];
                }
                let mut effects = Self::fetch_comments(state, item_id, env);
                effects.push(Self::schedule_tick(state, item_id, env));
                effects
            },
            ItemsAction::StopCommentPolling => {
                state.polling.active = false;
                state.polling.generation += 1;
                smallvec![Effect::None]
            },
            ItemsAction::Reset => {
                let generation = state.polling.generation + 1;
                *state = ItemsState {
                    polling: CommentPolling {
                        generation,
                        active: false,
                    },
                    ..ItemsState::default()
                };
                smallvec![Effect::None]
            },
            ItemsAction::Request(event) => {
                state.details.track(&event);
                if let Outcome::Fulfilled(payload) = event.outcome {
                    let details = &mut state.details.data;
                    match (event.op, payload) {
                        (_, ItemsPayload::Item(mut item)) => {
                            details.comments = std::mem::take(&mut item.comments);
                            details.item = item;
                        },
                        (_, ItemsPayload::Comment(comment)) => details.comments.push(comment),
                        (_, ItemsPayload::Comments(comments)) => details.comments = comments,
                        (ItemsOp::Like(_), ItemsPayload::Done) => {
                            details.item.like = true;
                            details.item.likes_count += 1;
                        },
                        (ItemsOp::Unlike(_), ItemsPayload::Done) => {
                            details.item.like = false;
                            details.item.likes_count -= 1;
                        },
                        (_, ItemsPayload::Done) => {},
                    }
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// The loaded item
#[must_use]
pub const fn item(state: &ItemsState) -> &GetItemResponse {
    &state.details.data.item
}

/// Comments of the loaded item
#[must_use]
pub fn comments(state: &ItemsState) -> &[CommentData] {
    &state.details.data.comments
}

