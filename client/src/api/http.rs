//! [`CatalogApi`] over HTTP with `reqwest`.

use super::types::{
    AuthenticationResponse, CreateCollectionRequest, CreateCommentRequest, CreateCommentResponse,
    EditCollectionRequest, GetCollectionItemsResponse, GetCollectionResponse, GetCommentsResponse,
    GetFieldsResponse, GetItemForEditingResponse, GetItemResponse, GetLargestCollectionsResponse,
    GetLatestItemsResponse, GetMyCollectionsResponse, GetTagsResponse, GetUsersResponse,
    ImageUpload, ItemRequest, ItemsQuery, LoginRequest, PageRequest, RegisterRequest,
    SaveImageResponse, SearchCollectionsResponse, SearchItemsResponse, SearchRequest,
    SearchTagsRequest, TopicData, UserModification,
};
use super::{ApiFuture, CatalogApi};
use crate::storage::keys;
use catalog_core::ApiError;
use catalog_core::environment::KeyValueStore;
use metrics::counter;
use reqwest::{Method, RequestBuilder, Response, StatusCode, multipart};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

/// Whether a request carries the stored session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Anonymous,
    Authorized,
}

/// HTTP implementation of [`CatalogApi`]
///
/// Authorised calls read the bearer token from storage on every request, so
/// a login or logout takes effect immediately without rebuilding the client.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStore>,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url`
    #[must_use]
    pub fn new(base_url: Url, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, storage)
    }

    /// Create a client reusing an existing `reqwest` client
    #[must_use]
    pub const fn with_client(
        client: reqwest::Client,
        base_url: Url,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            client,
            base_url,
            storage,
        }
    }

    /// The API root
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, access: Access) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        let builder = self.client.request(method, url);

        match access {
            Access::Authorized => match self.storage.get(keys::TOKEN) {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            },
            Access::Anonymous => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build().map_err(|e| {
            error!(error = %e, "Failed to build API request");
            ApiError::transport(e.to_string())
        })?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        debug!(%method, %path, "API request");
        counter!("api.requests.total").increment(1);

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(%method, %path, error = %e, "API request failed without a response");
                counter!("api.errors.total", "status" => "0").increment(1);
                return Err(ApiError::transport(e.to_string()));
            },
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::new(error_message(status, &body), status.as_u16());
        warn!(%method, %path, status = error.status, message = %error.message, "API request rejected");
        counter!("api.errors.total", "status" => status.as_u16().to_string()).increment(1);
        Err(error)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let path = response.url().path().to_string();
        response.json::<T>().await.map_err(|e| {
            error!(%path, error = %e, "API response body could not be decoded");
            counter!("api.errors.total", "status" => "0").increment(1);
            ApiError::transport(format!("Invalid response body: {e}"))
        })
    }

    async fn empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.execute(builder).await.map(|_| ())
    }
}

/// Message of an error response
///
/// The JSON `message` field when present, else the body text, else the
/// status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

fn page_query(page: PageRequest) -> [(&'static str, u32); 2] {
    [("page", page.page), ("count", page.count)]
}

fn search_query(request: &SearchRequest) -> [(&'static str, String); 3] {
    [
        ("searchString", request.search_string.clone()),
        ("page", request.page.to_string()),
        ("count", request.count.to_string()),
    ]
}

impl CatalogApi for HttpApi {
    fn register(&self, request: RegisterRequest) -> ApiFuture<'_, AuthenticationResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, "/users/register", Access::Anonymous)
                .json(&request);
            self.json(builder).await
        })
    }

    fn login(&self, request: LoginRequest) -> ApiFuture<'_, AuthenticationResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, "/users/login", Access::Anonymous)
                .json(&request);
            self.json(builder).await
        })
    }

    fn get_users(&self, page: PageRequest) -> ApiFuture<'_, GetUsersResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/users", Access::Authorized)
                .query(&page_query(page));
            self.json(builder).await
        })
    }

    fn modify_users(&self, modification: UserModification, ids: Vec<i64>) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/users/{}", modification.as_str());
            let builder = self
                .request(Method::PUT, &path, Access::Authorized)
                .json(&ids);
            self.empty(builder).await
        })
    }

    fn delete_users(&self, ids: Vec<i64>) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let builder = self
                .request(Method::DELETE, "/users", Access::Authorized)
                .json(&ids);
            self.empty(builder).await
        })
    }

    fn get_my_collections(&self, page: PageRequest) -> ApiFuture<'_, GetMyCollectionsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/collections", Access::Authorized)
                .query(&page_query(page));
            self.json(builder).await
        })
    }

    fn create_collection(&self, request: CreateCollectionRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, "/collections", Access::Authorized)
                .json(&request);
            self.empty(builder).await
        })
    }

    fn edit_collection(&self, request: EditCollectionRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let builder = self
                .request(Method::PUT, "/collections", Access::Authorized)
                .json(&request);
            self.empty(builder).await
        })
    }

    fn delete_collection(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/collections/{id}");
            self.empty(self.request(Method::DELETE, &path, Access::Authorized))
                .await
        })
    }

    fn get_collection(&self, id: i64) -> ApiFuture<'_, GetCollectionResponse> {
        Box::pin(async move {
            let path = format!("/collections/{id}");
            self.json(self.request(Method::GET, &path, Access::Authorized))
                .await
        })
    }

    fn get_collection_items(
        &self,
        id: i64,
        query: ItemsQuery,
    ) -> ApiFuture<'_, GetCollectionItemsResponse> {
        Box::pin(async move {
            let path = format!("/collections/{id}");
            let builder = self
                .request(Method::GET, &path, Access::Authorized)
                .query(&query.pairs());
            self.json(builder).await
        })
    }

    fn get_fields(&self, id: i64) -> ApiFuture<'_, GetFieldsResponse> {
        Box::pin(async move {
            let path = format!("/collections/{id}/fields");
            self.json(self.request(Method::GET, &path, Access::Anonymous))
                .await
        })
    }

    fn get_collection_tags(&self, id: i64) -> ApiFuture<'_, GetTagsResponse> {
        Box::pin(async move {
            let path = format!("/collections/{id}/tags");
            self.json(self.request(Method::GET, &path, Access::Anonymous))
                .await
        })
    }

    fn search_collections(&self, request: SearchRequest) -> ApiFuture<'_, SearchCollectionsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/collections/search", Access::Anonymous)
                .query(&search_query(&request));
            self.json(builder).await
        })
    }

    fn largest_collections(&self, count: u32) -> ApiFuture<'_, GetLargestCollectionsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/collections/largest", Access::Anonymous)
                .query(&[("count", count)]);
            self.json(builder).await
        })
    }

    fn topics(&self) -> ApiFuture<'_, Vec<TopicData>> {
        Box::pin(async move {
            self.json(self.request(Method::GET, "/collections/topics", Access::Anonymous))
                .await
        })
    }

    fn create_item(&self, collection_id: i64, request: ItemRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/collections/{collection_id}/items");
            let builder = self
                .request(Method::POST, &path, Access::Authorized)
                .json(&request);
            self.empty(builder).await
        })
    }

    fn edit_item(&self, collection_id: i64, request: ItemRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/collections/{collection_id}/items");
            let builder = self
                .request(Method::PUT, &path, Access::Authorized)
                .json(&request);
            self.empty(builder).await
        })
    }

    fn delete_item(&self, collection_id: i64, item_id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/collections/{collection_id}/items/{item_id}");
            self.empty(self.request(Method::DELETE, &path, Access::Authorized))
                .await
        })
    }

    fn delete_items(&self, collection_id: i64, ids: Vec<i64>) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/collections/{collection_id}/items");
            let builder = self
                .request(Method::DELETE, &path, Access::Authorized)
                .json(&ids);
            self.empty(builder).await
        })
    }

    fn get_item(&self, id: i64) -> ApiFuture<'_, GetItemResponse> {
        Box::pin(async move {
            let path = format!("/items/{id}");
            self.json(self.request(Method::GET, &path, Access::Authorized))
                .await
        })
    }

    fn get_item_for_editing(&self, id: i64) -> ApiFuture<'_, GetItemForEditingResponse> {
        Box::pin(async move {
            let path = format!("/items/{id}/edit");
            self.json(self.request(Method::GET, &path, Access::Authorized))
                .await
        })
    }

    fn create_comment(
        &self,
        item_id: i64,
        request: CreateCommentRequest,
    ) -> ApiFuture<'_, CreateCommentResponse> {
        Box::pin(async move {
            let path = format!("/items/{item_id}");
            let builder = self
                .request(Method::POST, &path, Access::Authorized)
                .json(&request);
            self.json(builder).await
        })
    }

    fn get_comments(&self, item_id: i64) -> ApiFuture<'_, GetCommentsResponse> {
        Box::pin(async move {
            let path = format!("/items/{item_id}/comments");
            self.json(self.request(Method::GET, &path, Access::Anonymous))
                .await
        })
    }

    fn like(&self, item_id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/items/{item_id}/like");
            self.empty(self.request(Method::POST, &path, Access::Authorized))
                .await
        })
    }

    fn unlike(&self, item_id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/items/{item_id}/unlike");
            self.empty(self.request(Method::POST, &path, Access::Authorized))
                .await
        })
    }

    fn latest_items(&self, count: u32) -> ApiFuture<'_, GetLatestItemsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/items/latest", Access::Anonymous)
                .query(&[("count", count)]);
            self.json(builder).await
        })
    }

    fn search_items(&self, request: SearchRequest) -> ApiFuture<'_, SearchItemsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/items/search", Access::Anonymous)
                .query(&search_query(&request));
            self.json(builder).await
        })
    }

    fn most_used_tags(&self, count: u32) -> ApiFuture<'_, GetTagsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/tags", Access::Anonymous)
                .query(&[("count", count)]);
            self.json(builder).await
        })
    }

    fn search_tags(&self, request: SearchTagsRequest) -> ApiFuture<'_, GetTagsResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "/tags/search", Access::Anonymous)
                .query(&request);
            self.json(builder).await
        })
    }

    fn upload_image(&self, image: ImageUpload) -> ApiFuture<'_, SaveImageResponse> {
        Box::pin(async move {
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|e| ApiError::transport(format!("Invalid image content type: {e}")))?;
            let form = multipart::Form::new().part("Image", part);
            let builder = self
                .request(Method::POST, "/images", Access::Authorized)
                .multipart(form);
            self.json(builder).await
        })
    }
}
