//! Item editor: fields of the owning collection, draft values, tag
//! suggestions.

use crate::api::{
    FieldData, GetFieldsResponse, GetItemForEditingResponse, GetTagsResponse, ItemRequest,
    SearchTagsRequest,
};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, ApiError, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Data of the item editor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ItemEditor {
    /// Values being edited
    pub draft: ItemRequest,
    /// Field definitions of the owning collection
    pub fields: Vec<FieldData>,
    /// Tag autocomplete suggestions
    pub suggestions: Vec<String>,
}

/// Item slice
pub type ItemState = AsyncSlice<ItemEditor>;

/// Remote operations of the item feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOp {
    /// `GET /collections/{id}/fields`
    LoadFields(i64),
    /// `GET /items/{id}/edit`
    LoadForEdit(i64),
    /// `POST /collections/{id}/items`
    Create,
    /// `PUT /collections/{id}/items`
    Edit,
    /// `GET /tags/search`
    SearchTags,
}

/// Payloads of the item feature
#[derive(Debug, Clone, PartialEq)]
pub enum ItemPayload {
    /// Field definitions
    Fields(GetFieldsResponse),
    /// Stored item
    ForEdit(GetItemForEditingResponse),
    /// Saved
    Saved,
    /// Tag suggestions
    Tags(GetTagsResponse),
}

/// Item actions
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    /// Load the fields of a collection for a new item
    LoadFields(i64),
    /// Load an item and its fields for editing
    LoadForEdit(i64),
    /// Save a new item
    Create {
        /// Owning collection
        collection_id: i64,
        /// Validated values
        request: ItemRequest,
    },
    /// Save changes to an item; `request.id` names the item
    Edit {
        /// Owning collection
        collection_id: i64,
        /// Validated values
        request: ItemRequest,
    },
    /// Fetch tag suggestions
    SearchTags(SearchTagsRequest),
    /// Add a tag to the draft
    AddTag(String),
    /// Remove the draft tag at the given position
    RemoveTag(usize),
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<ItemOp, ItemPayload>),
}

request_lifecycle!(ItemAction);

/// Item reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemReducer;

impl ItemReducer {
    fn start<F>(state: &mut ItemState, op: ItemOp, call: F) -> SmallVec<[Effect<ItemAction>; 4]>
    where
        F: std::future::Future<Output = Result<ItemPayload, ApiError>> + Send + 'static,
    {
        state.track(&RequestEvent::<_, ItemPayload>::pending(op));
        smallvec![perform(op, Origin::Global, call, ItemAction::Request)]
    }
}

impl Reducer for ItemReducer {
    type State = ItemState;
    type Action = ItemAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut ItemState,
        action: ItemAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<ItemAction>; 4]> {
        let api = Arc::clone(&env.api);
        match action {
            ItemAction::LoadFields(collection_id) => {
                Self::start(state, ItemOp::LoadFields(collection_id), async move {
                    api.get_fields(collection_id).await.map(ItemPayload::Fields)
                })
            },
            ItemAction::LoadForEdit(item_id) => {
                Self::start(state, ItemOp::LoadForEdit(item_id), async move {
                    api.get_item_for_editing(item_id)
                        .await
                        .map(ItemPayload::ForEdit)
                })
            },
            ItemAction::Create {
                collection_id,
                request,
            } => Self::start(state, ItemOp::Create, async move {
                api.create_item(collection_id, request).await?;
                Ok(ItemPayload::Saved)
            }),
            ItemAction::Edit {
                collection_id,
                request,
            } => Self::start(state, ItemOp::Edit, async move {
                api.edit_item(collection_id, request).await?;
                Ok(ItemPayload::Saved)
            }),
            ItemAction::SearchTags(request) => Self::start(state, ItemOp::SearchTags, async move {
                api.search_tags(request).await.map(ItemPayload::Tags)
            }),
            ItemAction::AddTag(tag) => {
                state.data.draft.tags.push(tag);
                smallvec![Effect::None]
            },
            ItemAction::RemoveTag(index) => {
                if index < state.data.draft.tags.len() {
                    state.data.draft.tags.remove(index);
                }
                smallvec![Effect::None]
            },
            ItemAction::Reset => {
                *state = ItemState::default();
                smallvec![Effect::None]
            },
            ItemAction::Request(event) => {
                state.track(&event);
                if let Outcome::Fulfilled(payload) = event.outcome {
                    let editor = &mut state.data;
                    match payload {
                        ItemPayload::Fields(response) => editor.fields = response.fields,
                        ItemPayload::ForEdit(response) => {
                            editor.draft = ItemRequest {
                                id: None,
                                name: response.name,
                                tags: response.tags,
                                int_fields: response.int_fields,
                                bool_fields: response.bool_fields,
                                string_fields: response.string_fields,
                                date_time_fields: response.date_time_fields,
                            };
                            editor.fields = response.fields;
                        },
                        ItemPayload::Tags(response) => editor.suggestions = response.tags,
                        ItemPayload::Saved => {},
                    }
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// The draft as a form expects it: dates cut to `YYYY-MM-DD`
#[must_use]
pub fn item_for_edit(state: &ItemState) -> ItemRequest {
    let mut draft = state.data.draft.clone();
    for field in &mut draft.date_time_fields {
        field.value = field.value.chars().take(10).collect();
    }
    draft
}

/// Tag suggestions
#[must_use]
pub fn suggestions(state: &ItemState) -> &[String] {
    &state.data.suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DateTimeValueData;

    #[test]
    fn edit_view_cuts_dates() {
        let mut state = ItemState::default();
        state.data.draft.date_time_fields.push(DateTimeValueData {
            field_id: 1,
            value: "2021-03-04T00:00:00.000Z".to_string(),
        });
        state.data.draft.date_time_fields.push(DateTimeValueData {
            field_id: 2,
            value: "2021".to_string(),
        });

        let view = item_for_edit(&state);
        assert_eq!(view.date_time_fields[0].value, "2021-03-04");
        assert_eq!(view.date_time_fields[1].value, "2021");
        assert_eq!(state.data.draft.date_time_fields[0].value.len(), 24);
    }
}
