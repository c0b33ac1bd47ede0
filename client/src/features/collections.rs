//! The signed-in user's collections.

use crate::api::{CollectionData, GetMyCollectionsResponse, PageRequest};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use std::sync::Arc;

/// Collections slice
pub type CollectionsState = AsyncSlice<GetMyCollectionsResponse>;

/// Remote operations of the collections feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionsOp {
    /// Fetch a page
    Load(PageRequest),
    /// Delete one collection, then re-fetch the page
    Delete {
        /// Deleted collection
        id: i64,
    },
}

/// Collections actions
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionsAction {
    /// Fetch a page of the user's collections
    Load(PageRequest),
    /// Delete a collection and reload `page`
    Delete {
        /// Collection to delete
        id: i64,
        /// Page to show afterwards
        page: PageRequest,
    },
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<CollectionsOp, GetMyCollectionsResponse>),
}

request_lifecycle!(CollectionsAction);

/// Collections reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionsReducer;

impl Reducer for CollectionsReducer {
    type State = CollectionsState;
    type Action = CollectionsAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut CollectionsState,
        action: CollectionsAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<CollectionsAction>; 4]> {
        let api = Arc::clone(&env.api);
        match action {
            CollectionsAction::Load(page) => {
                let op = CollectionsOp::Load(page);
                state.track(&RequestEvent::<_, GetMyCollectionsResponse>::pending(op.clone()));
                smallvec![perform(
                    op,
                    Origin::Global,
                    async move { api.get_my_collections(page).await },
                    CollectionsAction::Request,
                )]
            },
            CollectionsAction::Delete { id, page } => {
                let op = CollectionsOp::Delete { id };
                state.track(&RequestEvent::<_, GetMyCollectionsResponse>::pending(op.clone()));
                smallvec![perform(
                    op,
                    Origin::Global,
                    async move {
                        api.delete_collection(id).await?;
                        api.get_my_collections(page).await
                    },
                    CollectionsAction::Request,
                )]
            },
            CollectionsAction::Reset => {
                *state = CollectionsState::default();
                smallvec![Effect::None]
            },
            CollectionsAction::Request(event) => {
                state.track(&event);
                if let Outcome::Fulfilled(payload) = event.outcome {
                    state.data = payload;
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Collections on the loaded page
#[must_use]
pub fn collections(state: &CollectionsState) -> &[CollectionData] {
    &state.data.collections
}

/// Number of pages
#[must_use]
pub const fn pages_count(state: &CollectionsState) -> u32 {
    state.data.pages_count
}
