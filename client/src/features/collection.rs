//! Collection editor: load, create, edit, cover image and field list.

use crate::api::{
    CollectionData, CreateCollectionRequest, CreateFieldData, EditCollectionRequest, FieldData,
    GetCollectionResponse, ImageUpload, SaveImageResponse,
};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use std::sync::Arc;

/// Collection slice
pub type CollectionState = AsyncSlice<CollectionData>;

/// A collection that has not been saved yet
#[must_use]
pub fn blank() -> CollectionData {
    CollectionData {
        id: -1,
        name: String::new(),
        description: String::new(),
        topic_id: 1,
        fields: Vec::new(),
        image_url: None,
    }
}

/// Initial collection slice
#[must_use]
pub fn initial() -> CollectionState {
    AsyncSlice::new(blank())
}

/// Remote operations of the collection feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOp {
    /// `GET /collections/{id}`
    GetById(i64),
    /// `POST /collections`
    Create,
    /// `PUT /collections`
    Edit,
    /// `POST /images`
    UploadImage,
}

/// Payloads of the collection feature
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionPayload {
    /// The collection was loaded
    Loaded(GetCollectionResponse),
    /// The collection was saved
    Saved,
    /// The cover image was stored
    ImageUploaded(SaveImageResponse),
}

/// Collection actions
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction {
    /// Load a collection into the editor
    GetById(i64),
    /// Save a new collection
    Create(CreateCollectionRequest),
    /// Save changes to an existing collection
    Edit(EditCollectionRequest),
    /// Upload a cover image and use it
    UploadImage(ImageUpload),
    /// Rename the field at `index`
    SetFieldName {
        /// Field position
        index: usize,
        /// New name
        value: String,
    },
    /// Append an unsaved field
    AddField(CreateFieldData),
    /// Remove the field at `index`
    RemoveField {
        /// Field position
        index: usize,
    },
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<CollectionOp, CollectionPayload>),
}

request_lifecycle!(CollectionAction);

/// Collection reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionReducer;

impl CollectionReducer {
    fn start<F>(state: &mut CollectionState, op: CollectionOp, call: F) -> SmallVec<[Effect<CollectionAction>; 4]>
    where
        F: std::future::Future<Output = Result<CollectionPayload, catalog_core::ApiError>>
            + Send
            + 'static,
    {
        state.track(&RequestEvent::<_, CollectionPayload>::pending(op));
        smallvec![perform(op, Origin::Global, call, CollectionAction::Request)]
    }
}

impl Reducer for CollectionReducer {
    type State = CollectionState;
    type Action = CollectionAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut CollectionState,
        action: CollectionAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<CollectionAction>; 4]> {
        let api = Arc::clone(&env.api);
        match action {
            CollectionAction::GetById(id) => Self::start(state, CollectionOp::GetById(id), async move {
                api.get_collection(id).await.map(CollectionPayload::Loaded)
            }),
            CollectionAction::Create(request) => Self::start(state, CollectionOp::Create, async move {
                api.create_collection(request).await?;
                Ok(CollectionPayload::Saved)
            }),
            CollectionAction::Edit(request) => Self::start(state, CollectionOp::Edit, async move {
                api.edit_collection(request).await?;
                Ok(CollectionPayload::Saved)
            }),
            CollectionAction::UploadImage(image) => {
                Self::start(state, CollectionOp::UploadImage, async move {
                    api.upload_image(image).await.map(CollectionPayload::ImageUploaded)
                })
            },
            CollectionAction::SetFieldName { index, value } => {
                if let Some(field) = state.data.fields.get_mut(index) {
                    field.name = value;
                }
                smallvec![Effect::None]
            },
            CollectionAction::AddField(field) => {
                state.data.fields.push(FieldData {
                    id: 0,
                    name: field.name,
                    field_type: field.field_type,
                });
                smallvec![Effect::None]
            },
            CollectionAction::RemoveField { index } => {
                if index < state.data.fields.len() {
                    state.data.fields.remove(index);
                }
                smallvec![Effect::None]
            },
            CollectionAction::Reset => {
                *state = initial();
                smallvec![Effect::None]
            },
            CollectionAction::Request(event) => {
                state.track(&event);
                match event.outcome {
                    Outcome::Fulfilled(CollectionPayload::Loaded(response)) => {
                        state.data = response.collection();
                    },
                    Outcome::Fulfilled(CollectionPayload::ImageUploaded(image)) => {
                        state.data.image_url = Some(image.image_url);
                    },
                    Outcome::Fulfilled(CollectionPayload::Saved)
                    | Outcome::Pending
                    | Outcome::Rejected(_) => {},
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Cover image of the collection in the editor
#[must_use]
pub fn image_url(state: &CollectionState) -> Option<&str> {
    state.data.image_url.as_deref()
}

