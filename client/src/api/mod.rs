//! Remote catalog API.
//!
//! [`CatalogApi`] is the boundary every feature effect calls through. The
//! production implementation is [`http::HttpApi`]; tests substitute their
//! own implementation.

use catalog_core::ApiError;
use std::future::Future;
use std::pin::Pin;

pub mod http;
pub mod types;

pub use http::HttpApi;
pub use types::*;

/// Boxed future returned by every [`CatalogApi`] call
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Every endpoint of the catalog API
///
/// Arguments are owned so callers can move them into an effect.
///
/// # Errors
///
/// Every call rejects with an [`ApiError`]: the server's `{message, status}`
/// for error responses, status `0` when no response arrived.
///
/// # Dyn Compatibility
///
/// Calls return [`ApiFuture`] instead of using `async fn` so the API can be
/// held as `Arc<dyn CatalogApi>` in the environment and captured by effects.
pub trait CatalogApi: Send + Sync {
    // --- users ---

    /// `POST /users/register`
    fn register(&self, request: RegisterRequest) -> ApiFuture<'_, AuthenticationResponse>;

    /// `POST /users/login`
    fn login(&self, request: LoginRequest) -> ApiFuture<'_, AuthenticationResponse>;

    /// `GET /users?page&count` (admin)
    fn get_users(&self, page: PageRequest) -> ApiFuture<'_, GetUsersResponse>;

    /// `PUT /users/{modification}` with the ids as body (admin)
    fn modify_users(&self, modification: UserModification, ids: Vec<i64>) -> ApiFuture<'_, ()>;

    /// `DELETE /users` with the ids as body (admin)
    fn delete_users(&self, ids: Vec<i64>) -> ApiFuture<'_, ()>;

    // --- collections ---

    /// `GET /collections?page&count`: the signed-in user's collections
    fn get_my_collections(&self, page: PageRequest) -> ApiFuture<'_, GetMyCollectionsResponse>;

    /// `POST /collections`
    fn create_collection(&self, request: CreateCollectionRequest) -> ApiFuture<'_, ()>;

    /// `PUT /collections`
    fn edit_collection(&self, request: EditCollectionRequest) -> ApiFuture<'_, ()>;

    /// `DELETE /collections/{id}`
    fn delete_collection(&self, id: i64) -> ApiFuture<'_, ()>;

    /// `GET /collections/{id}`: the collection with its fields and items
    fn get_collection(&self, id: i64) -> ApiFuture<'_, GetCollectionResponse>;

    /// `GET /collections/{id}` with sort and filter parameters
    fn get_collection_items(
        &self,
        id: i64,
        query: ItemsQuery,
    ) -> ApiFuture<'_, GetCollectionItemsResponse>;

    /// `GET /collections/{id}/fields`
    fn get_fields(&self, id: i64) -> ApiFuture<'_, GetFieldsResponse>;

    /// `GET /collections/{id}/tags`
    fn get_collection_tags(&self, id: i64) -> ApiFuture<'_, GetTagsResponse>;

    /// `GET /collections/search?searchString&page&count`
    fn search_collections(&self, request: SearchRequest) -> ApiFuture<'_, SearchCollectionsResponse>;

    /// `GET /collections/largest?count`
    fn largest_collections(&self, count: u32) -> ApiFuture<'_, GetLargestCollectionsResponse>;

    /// `GET /collections/topics`
    fn topics(&self) -> ApiFuture<'_, Vec<TopicData>>;

    // --- items ---

    /// `POST /collections/{collection_id}/items`
    fn create_item(&self, collection_id: i64, request: ItemRequest) -> ApiFuture<'_, ()>;

    /// `PUT /collections/{collection_id}/items`
    fn edit_item(&self, collection_id: i64, request: ItemRequest) -> ApiFuture<'_, ()>;

    /// `DELETE /collections/{collection_id}/items/{item_id}`
    fn delete_item(&self, collection_id: i64, item_id: i64) -> ApiFuture<'_, ()>;

    /// `DELETE /collections/{collection_id}/items` with the ids as body
    fn delete_items(&self, collection_id: i64, ids: Vec<i64>) -> ApiFuture<'_, ()>;

    /// `GET /items/{id}`
    fn get_item(&self, id: i64) -> ApiFuture<'_, GetItemResponse>;

    /// `GET /items/{id}/edit`
    fn get_item_for_editing(&self, id: i64) -> ApiFuture<'_, GetItemForEditingResponse>;

    /// `POST /items/{id}`
    fn create_comment(
        &self,
        item_id: i64,
        request: CreateCommentRequest,
    ) -> ApiFuture<'_, CreateCommentResponse>;

    /// `GET /items/{id}/comments`
    fn get_comments(&self, item_id: i64) -> ApiFuture<'_, GetCommentsResponse>;

    /// `POST /items/{id}/like`
    fn like(&self, item_id: i64) -> ApiFuture<'_, ()>;

    /// `POST /items/{id}/unlike`
    fn unlike(&self, item_id: i64) -> ApiFuture<'_, ()>;

    /// `GET /items/latest?count`
    fn latest_items(&self, count: u32) -> ApiFuture<'_, GetLatestItemsResponse>;

    /// `GET /items/search?searchString&page&count`
    fn search_items(&self, request: SearchRequest) -> ApiFuture<'_, SearchItemsResponse>;

    // --- tags and images ---

    /// `GET /tags?count`
    fn most_used_tags(&self, count: u32) -> ApiFuture<'_, GetTagsResponse>;

    /// `GET /tags/search?str&count`
    fn search_tags(&self, request: SearchTagsRequest) -> ApiFuture<'_, GetTagsResponse>;

    /// `POST /images`, multipart field `Image`
    fn upload_image(&self, image: ImageUpload) -> ApiFuture<'_, SaveImageResponse>;
}
