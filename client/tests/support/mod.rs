//! Shared fixtures for client integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use catalog_client::api::*;
use catalog_client::config::Config;
use catalog_client::{App, AppEnvironment};
use catalog_core::ApiError;
use catalog_core::environment::KeyValueStore;
use catalog_testing::InMemoryStorage;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned replies per endpoint, recording every call
#[derive(Default)]
pub struct StubApi {
    replies: Mutex<HashMap<&'static str, Result<Value, ApiError>>>,
    calls: Mutex<Vec<&'static str>>,
    arguments: Mutex<Vec<(&'static str, Value)>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `endpoint` with `body`
    pub fn ok(&self, endpoint: &'static str, body: impl Serialize) -> &Self {
        let body = serde_json::to_value(body).unwrap();
        self.replies.lock().unwrap().insert(endpoint, Ok(body));
        self
    }

    /// Answer `endpoint` with an empty success
    pub fn ok_empty(&self, endpoint: &'static str) -> &Self {
        self.replies.lock().unwrap().insert(endpoint, Ok(Value::Null));
        self
    }

    /// Reject `endpoint` with `error`
    pub fn fail(&self, endpoint: &'static str, error: ApiError) -> &Self {
        self.replies.lock().unwrap().insert(endpoint, Err(error));
        self
    }

    /// Number of calls made to `endpoint`
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| **called == endpoint)
            .count()
    }

    /// Every endpoint called, in order
    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of every recorded call to `endpoint`, in order
    pub fn arguments<T: DeserializeOwned>(&self, endpoint: &str) -> Vec<T> {
        self.arguments
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| *called == endpoint)
            .map(|(_, args)| serde_json::from_value(args.clone()).unwrap())
            .collect()
    }

    fn respond_to<T>(&self, endpoint: &'static str, args: impl Serialize) -> ApiFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let args = serde_json::to_value(args).unwrap();
        self.arguments.lock().unwrap().push((endpoint, args));
        self.respond(endpoint)
    }

    fn respond<T>(&self, endpoint: &'static str) -> ApiFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.calls.lock().unwrap().push(endpoint);
        let reply = self.replies.lock().unwrap().get(endpoint).cloned();
        Box::pin(async move {
            match reply {
                Some(Ok(body)) => {
                    serde_json::from_value(body).map_err(|e| ApiError::new(e.to_string(), 500))
                },
                Some(Err(error)) => Err(error),
                None => Err(ApiError::new(format!("{endpoint} is not stubbed"), 501)),
            }
        })
    }
}

impl CatalogApi for StubApi {
    fn register(&self, _: RegisterRequest) -> ApiFuture<'_, AuthenticationResponse> {
        self.respond("register")
    }

    fn login(&self, _: LoginRequest) -> ApiFuture<'_, AuthenticationResponse> {
        self.respond("login")
    }

    fn get_users(&self, page: PageRequest) -> ApiFuture<'_, GetUsersResponse> {
        self.respond_to("get_users", page)
    }

    fn modify_users(&self, modification: UserModification, ids: Vec<i64>) -> ApiFuture<'_, ()> {
        self.respond_to("modify_users", (modification, ids))
    }

    fn delete_users(&self, ids: Vec<i64>) -> ApiFuture<'_, ()> {
        self.respond_to("delete_users", ids)
    }

    fn get_my_collections(&self, _: PageRequest) -> ApiFuture<'_, GetMyCollectionsResponse> {
        self.respond("get_my_collections")
    }

    fn create_collection(&self, _: CreateCollectionRequest) -> ApiFuture<'_, ()> {
        self.respond("create_collection")
    }

    fn edit_collection(&self, _: EditCollectionRequest) -> ApiFuture<'_, ()> {
        self.respond("edit_collection")
    }

    fn delete_collection(&self, _: i64) -> ApiFuture<'_, ()> {
        self.respond("delete_collection")
    }

    fn get_collection(&self, _: i64) -> ApiFuture<'_, GetCollectionResponse> {
        self.respond("get_collection")
    }

    fn get_collection_items(
        &self,
        collection_id: i64,
        query: ItemsQuery,
    ) -> ApiFuture<'_, GetCollectionItemsResponse> {
        self.respond_to("get_collection_items", (collection_id, query))
    }

    fn get_fields(&self, _: i64) -> ApiFuture<'_, GetFieldsResponse> {
        self.respond("get_fields")
    }

    fn get_collection_tags(&self, _: i64) -> ApiFuture<'_, GetTagsResponse> {
        self.respond("get_collection_tags")
    }

    fn search_collections(&self, _: SearchRequest) -> ApiFuture<'_, SearchCollectionsResponse> {
        self.respond("search_collections")
    }

    fn largest_collections(&self, _: u32) -> ApiFuture<'_, GetLargestCollectionsResponse> {
        self.respond("largest_collections")
    }

    fn topics(&self) -> ApiFuture<'_, Vec<TopicData>> {
        self.respond("topics")
    }

    fn create_item(&self, _: i64, _: ItemRequest) -> ApiFuture<'_, ()> {
        self.respond("create_item")
    }

    fn edit_item(&self, _: i64, _: ItemRequest) -> ApiFuture<'_, ()> {
        self.respond("edit_item")
    }

    fn delete_item(&self, _: i64, _: i64) -> ApiFuture<'_, ()> {
        self.respond("delete_item")
    }

    fn delete_items(&self, collection_id: i64, ids: Vec<i64>) -> ApiFuture<'_, ()> {
        self.respond_to("delete_items", (collection_id, ids))
    }

    fn get_item(&self, _: i64) -> ApiFuture<'_, GetItemResponse> {
        self.respond("get_item")
    }

    fn get_item_for_editing(&self, _: i64) -> ApiFuture<'_, GetItemForEditingResponse> {
        self.respond("get_item_for_editing")
    }

    fn create_comment(
        &self,
        _: i64,
        _: CreateCommentRequest,
    ) -> ApiFuture<'_, CreateCommentResponse> {
        self.respond("create_comment")
    }

    fn get_comments(&self, _: i64) -> ApiFuture<'_, GetCommentsResponse> {
        self.respond("get_comments")
    }

    fn like(&self, _: i64) -> ApiFuture<'_, ()> {
        self.respond("like")
    }

    fn unlike(&self, _: i64) -> ApiFuture<'_, ()> {
        self.respond("unlike")
    }

    fn latest_items(&self, _: u32) -> ApiFuture<'_, GetLatestItemsResponse> {
        self.respond("latest_items")
    }

    fn search_items(&self, _: SearchRequest) -> ApiFuture<'_, SearchItemsResponse> {
        self.respond("search_items")
    }

    fn most_used_tags(&self, _: u32) -> ApiFuture<'_, GetTagsResponse> {
        self.respond("most_used_tags")
    }

    fn search_tags(&self, _: SearchTagsRequest) -> ApiFuture<'_, GetTagsResponse> {
        self.respond("search_tags")
    }

    fn upload_image(&self, _: ImageUpload) -> ApiFuture<'_, SaveImageResponse> {
        self.respond("upload_image")
    }
}

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn environment(api: Arc<StubApi>, storage: Arc<InMemoryStorage>) -> AppEnvironment {
    let storage: Arc<dyn KeyValueStore> = storage;
    AppEnvironment::new(api, storage, Duration::from_millis(20))
}

pub fn test_config() -> Config {
    let mut config = Config::new(
        catalog_client::config::DEFAULT_API_URL.parse().unwrap(),
        std::env::temp_dir().join("catalog-test-storage.json"),
    );
    config.shutdown_timeout = Duration::from_secs(1);
    config
}

pub fn app(api: Arc<StubApi>, storage: Arc<InMemoryStorage>) -> App {
    App::with_environment(environment(api, storage), test_config())
}
