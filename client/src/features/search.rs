//! Full-text search over collections and items.

use crate::api::{SearchCollectionsResponse, SearchItemsResponse, SearchRequest};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Search results
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Matching collections
    pub collections_data: SearchCollectionsResponse,
    /// Matching items
    pub items_data: SearchItemsResponse,
}

/// Search slice
pub type SearchState = AsyncSlice<SearchResults>;

/// Remote operations of the search feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOp {
    /// `GET /collections/search`
    Collections,
    /// `GET /items/search`
    Items,
}

/// Payloads of the search feature
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPayload {
    /// A page of collections
    Collections(SearchCollectionsResponse),
    /// A page of items
    Items(SearchItemsResponse),
}

/// Search actions
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    /// Search collections
    Collections(SearchRequest),
    /// Search items
    Items(SearchRequest),
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<SearchOp, SearchPayload>),
}

request_lifecycle!(SearchAction);

/// Search reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchReducer;

impl Reducer for SearchReducer {
    type State = SearchState;
    type Action = SearchAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut SearchState,
        action: SearchAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<SearchAction>; 4]> {
        let api = Arc::clone(&env.api);
        match action {
            SearchAction::Collections(request) => {
                state.track(&RequestEvent::<_, SearchPayload>::pending(SearchOp::Collections));
                smallvec![perform(
                    SearchOp::Collections,
                    Origin::Global,
                    async move {
                        api.search_collections(request)
                            .await
                            .map(SearchPayload::Collections)
                    },
                    SearchAction::Request,
                )]
            },
            SearchAction::Items(request) => {
                state.track(&RequestEvent::<_, SearchPayload>::pending(SearchOp::Items));
                smallvec![perform(
                    SearchOp::Items,
                    Origin::Global,
                    async move { api.search_items(request).await.map(SearchPayload::Items) },
                    SearchAction::Request,
                )]
            },
            SearchAction::Reset => {
                *state = SearchState::default();
                smallvec![Effect::None]
            },
            SearchAction::Request(event) => {
                state.track(&event);
                match event.outcome {
                    Outcome::Fulfilled(SearchPayload::Collections(found)) => {
                        state.data.collections_data = found;
                    },
                    Outcome::Fulfilled(SearchPayload::Items(found)) => {
                        state.data.items_data = found;
                    },
                    Outcome::Pending | Outcome::Rejected(_) => {},
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Pages of collection matches
#[must_use]
pub const fn collections_pages_count(state: &SearchState) -> u32 {
    state.data.collections_data.pages_count
}

/// Pages of item matches
#[must_use]
pub const fn items_pages_count(state: &SearchState) -> u32 {
    state.data.items_data.pages_count
}
