//! Collection page: collection info, item table with sort and filter, tags.

use crate::api::{
    CollectionItemData, FieldData, GetCollectionItemsResponse, GetCollectionResponse,
    GetTagsResponse, ItemsQuery, SortDirection,
};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, ApiError, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Collection header shown above the item table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    /// Collection id
    pub id: i64,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Topic id
    pub topic_id: i64,
    /// Cover image
    pub image_url: Option<String>,
    /// True when the signed-in user owns the collection
    pub is_owner: bool,
}

/// Data of the collection page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CollectionPage {
    /// Header
    pub info: CollectionInfo,
    /// Item rows
    pub items: Vec<CollectionItemData>,
    /// Field definitions
    pub fields: Vec<FieldData>,
    /// Tags used in the collection
    pub tags: Vec<String>,
}

/// Collection items slice
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CollectionItemsState {
    /// Loaded page
    #[serde(flatten)]
    pub page: AsyncSlice<CollectionPage>,
    /// Sort and filter parameters sent with every item fetch
    pub params: ItemsQuery,
}

/// Remote operations of the collection items feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionItemsOp {
    /// `GET /collections/{id}` without parameters
    LoadCollection(i64),
    /// `GET /collections/{id}` with the current parameters
    LoadItems(i64),
    /// Delete items, then re-fetch the rows
    DeleteItems {
        /// Owning collection
        collection_id: i64,
    },
    /// `GET /collections/{id}/tags`
    LoadTags(i64),
}

/// Payloads of the collection items feature
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionItemsPayload {
    /// Header, fields and rows
    Collection(GetCollectionResponse),
    /// Rows only
    Items(GetCollectionItemsResponse),
    /// Tags
    Tags(GetTagsResponse),
}

/// Collection items actions
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionItemsAction {
    /// Load the collection header, fields and rows
    LoadCollection(i64),
    /// Re-fetch the rows with the current parameters
    LoadItems(i64),
    /// Delete the selected items and re-fetch the rows
    DeleteItems {
        /// Owning collection
        collection_id: i64,
        /// Selected item ids
        ids: Vec<i64>,
    },
    /// Load the tags used in the collection
    LoadTags(i64),
    /// Name filter, `None` clears it
    SetFilterName(Option<String>),
    /// Tag filter
    SetFilterTags(Vec<String>),
    /// Sort direction, `None` for server order
    SetSortDirection(Option<SortDirection>),
    /// Sort field, `None` sorts by name
    SetSortField(Option<i64>),
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<CollectionItemsOp, CollectionItemsPayload>),
}

request_lifecycle!(CollectionItemsAction);

/// Collection items reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionItemsReducer;

impl CollectionItemsReducer {
    fn start<F>(
        state: &mut CollectionItemsState,
        op: CollectionItemsOp,
        call: F,
    ) -> SmallVec<[Effect<CollectionItemsAction>; 4]>
    where
        F: std::future::Future<Output = Result<CollectionItemsPayload, ApiError>> + Send + 'static,
    {
        state
            .page
            .track(&RequestEvent::<_, CollectionItemsPayload>::pending(op.clone()));
        smallvec![perform(op, Origin::Global, call, CollectionItemsAction::Request)]
    }
}

impl Reducer for CollectionItemsReducer {
    type State = CollectionItemsState;
    type Action = CollectionItemsAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut CollectionItemsState,
        action: CollectionItemsAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<CollectionItemsAction>; 4]> {
        let api = Arc::clone(&env.api);
        match action {
            CollectionItemsAction::LoadCollection(id) => {
                Self::start(state, CollectionItemsOp::LoadCollection(id), async move {
                    api.get_collection(id)
                        .await
                        .map(CollectionItemsPayload::Collection)
                })
            },
            CollectionItemsAction::LoadItems(id) => {
                let params = state.params.clone();
                Self::start(state, CollectionItemsOp::LoadItems(id), async move {
                    api.get_collection_items(id, params)
                        .await
                        .map(CollectionItemsPayload::Items)
                })
            },
            CollectionItemsAction::DeleteItems { collection_id, ids } => {
                let params = state.params.clone();
                let op = CollectionItemsOp::DeleteItems { collection_id };
                Self::start(state, op, async move {
                    api.delete_items(collection_id, ids).await?;
                    api.get_collection_items(collection_id, params)
                        .await
                        .map(CollectionItemsPayload::Items)
                })
            },
            CollectionItemsAction::LoadTags(id) => {
                Self::start(state, CollectionItemsOp::LoadTags(id), async move {
                    api.get_collection_tags(id)
                        .await
                        .map(CollectionItemsPayload::Tags)
                })
            },
            CollectionItemsAction::SetFilterName(name) => {
                state.params.filter_name = name;
                smallvec![Effect::None]
            },
            CollectionItemsAction::SetFilterTags(tags) => {
                state.params.filter_tags = tags;
                smallvec![Effect::None]
            },
            CollectionItemsAction::SetSortDirection(direction) => {
                state.params.sort_by = direction;
                smallvec![Effect::None]
            },
            CollectionItemsAction::SetSortField(field) => {
                state.params.sort_field_id = field;
                smallvec![Effect::None]
            },
            CollectionItemsAction::Reset => {
                *state = CollectionItemsState::default();
                smallvec![Effect::None]
            },
            CollectionItemsAction::Request(event) => {
                state.page.track(&event);
                if let Outcome::Fulfilled(payload) = event.outcome {
                    let page = &mut state.page.data;
                    match payload {
                        CollectionItemsPayload::Collection(response) => {
                            page.info = CollectionInfo {
                                id: response.id,
                                name: response.name,
                                description: response.description,
                                topic_id: response.topic_id,
                                image_url: response.image_url,
                                is_owner: response.is_owner,
                            };
                            page.fields = response.fields;
                            page.items = response.items;
                        },
                        CollectionItemsPayload::Items(response) => page.items = response.items,
                        CollectionItemsPayload::Tags(response) => page.tags = response.tags,
                    }
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Item rows
#[must_use]
pub fn items(state: &CollectionItemsState) -> &[CollectionItemData] {
    &state.page.data.items
}

/// True when the signed-in user owns the collection
#[must_use]
pub const fn is_owner(state: &CollectionItemsState) -> bool {
    state.page.data.info.is_owner
}
