//! Home page: popular tags, latest items, largest collections.

use crate::api::{CollectionData, LatestItemData};
use crate::environment::AppEnvironment;
use catalog_core::effect::Effect;
use catalog_core::reducer::Reducer;
use catalog_core::{AsyncSlice, Origin, Outcome, RequestEvent, SmallVec, perform, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Data of the home page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HomeData {
    /// Most used tags
    pub tags: Vec<String>,
    /// Latest items
    pub items: Vec<LatestItemData>,
    /// Largest collections
    pub collections: Vec<CollectionData>,
}

/// Home slice
pub type HomeState = AsyncSlice<HomeData>;

/// Remote operations of the home feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeOp {
    /// `GET /tags`
    Tags,
    /// `GET /items/latest`
    LatestItems,
    /// `GET /collections/largest`
    LargestCollections,
}

/// Payloads of the home feature
#[derive(Debug, Clone, PartialEq)]
pub enum HomePayload {
    /// Most used tags
    Tags(Vec<String>),
    /// Latest items
    LatestItems(Vec<LatestItemData>),
    /// Largest collections
    LargestCollections(Vec<CollectionData>),
}

/// Home actions
#[derive(Debug, Clone, PartialEq)]
pub enum HomeAction {
    /// Load the `n` most used tags
    LoadTags(u32),
    /// Load the `n` latest items
    LoadLatestItems(u32),
    /// Load the `n` largest collections
    LoadLargestCollections(u32),
    /// Back to the initial state
    Reset,
    /// Lifecycle of a remote operation
    Request(RequestEvent<HomeOp, HomePayload>),
}

request_lifecycle!(HomeAction);

/// Home reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Action = HomeAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut HomeState,
        action: HomeAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<HomeAction>; 4]> {
        let api = Arc::clone(&env.api);
        let (op, effect) = match action {
            HomeAction::LoadTags(count) => (HomeOp::Tags, perform(
                HomeOp::Tags,
                Origin::Global,
                async move {
                    api.most_used_tags(count)
                        .await
                        .map(|r| HomePayload::Tags(r.tags))
                },
                HomeAction::Request,
            )),
            HomeAction::LoadLatestItems(count) => (HomeOp::LatestItems, perform(
                HomeOp::LatestItems,
                Origin::Global,
                async move {
                    api.latest_items(count)
                        .await
                        .map(|r| HomePayload::LatestItems(r.items))
                },
                HomeAction::Request,
            )),
            HomeAction::LoadLargestCollections(count) => (HomeOp::LargestCollections, perform(
                HomeOp::LargestCollections,
                Origin::Global,
                async move {
                    api.largest_collections(count)
                        .await
                        .map(|r| HomePayload::LargestCollections(r.collections))
                },
                HomeAction::Request,
            )),
            HomeAction::Reset => {
                *state = HomeState::default();
                return smallvec![Effect::None];
            },
            HomeAction::Request(event) => {
                state.track(&event);
                match event.outcome {
                    Outcome::Fulfilled(HomePayload::Tags(tags)) => state.data.tags = tags,
                    Outcome::Fulfilled(HomePayload::LatestItems(items)) => state.data.items = items,
                    Outcome::Fulfilled(HomePayload::LargestCollections(collections)) => {
                        state.data.collections = collections;
                    },
                    Outcome::Pending | Outcome::Rejected(_) => {},
                }
                return smallvec![Effect::None];
            },
        };

        state.track(&RequestEvent::<_, HomePayload>::pending(op));
        smallvec![effect]
    }
}
