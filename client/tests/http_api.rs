//! The HTTP API against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use catalog_client::api::{
    CatalogApi, HttpApi, ItemsQuery, LoginRequest, PageRequest, SortDirection, UserModification,
};
use catalog_client::storage::keys;
use catalog_core::environment::KeyValueStore;
use catalog_testing::InMemoryStorage;
use serde_json::json;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer, storage: Arc<InMemoryStorage>) -> HttpApi {
    let base = Url::parse(&format!("{}/CollectionsApi", server.uri())).unwrap();
    HttpApi::new(base, storage)
}

fn signed_in() -> Arc<InMemoryStorage> {
    Arc::new(InMemoryStorage::with_entries([(keys::TOKEN, "abc")]))
}

#[tokio::test]
async fn login_posts_credentials_and_reads_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/CollectionsApi/users/login"))
        .and(body_json(json!({"email": "alice@example.com", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "Alice", "jwtToken": "abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Arc::new(InMemoryStorage::new()));
    let session = api
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.name, "Alice");
    assert_eq!(session.jwt_token, "abc");
}

#[tokio::test]
async fn authorized_calls_send_the_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/CollectionsApi/users"))
        .and(header("Authorization", "Bearer abc"))
        .and(query_param("page", "2"))
        .and(query_param("count", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usersCount": 11,
            "pagesCount": 2,
            "users": [{"id": 11, "name": "Bob", "email": "bob@example.com", "status": true, "admin": false}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in());
    let page = api.get_users(PageRequest { page: 2, count: 10 }).await.unwrap();

    assert_eq!(page.pages_count, 2);
    assert_eq!(page.users[0].name, "Bob");
}

#[tokio::test]
async fn token_changes_apply_to_the_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/CollectionsApi/users/block"))
        .and(header("Authorization", "Bearer fresh"))
        .and(body_json(json!([1, 2])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in();
    let api = api_for(&server, Arc::clone(&storage));
    storage.set(keys::TOKEN, "fresh").unwrap();

    api.modify_users(UserModification::Block, vec![1, 2])
        .await
        .unwrap();
}

#[tokio::test]
async fn item_query_repeats_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/CollectionsApi/collections/4"))
        .and(query_param("sortBy", "desc"))
        .and(query_param("filterTags", "red"))
        .and(query_param("filterTags", "blue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in());
    let query = ItemsQuery {
        sort_by: Some(SortDirection::Desc),
        filter_name: Some(String::new()),
        filter_tags: vec!["red".to_string(), "blue".to_string()],
        ..ItemsQuery::default()
    };

    let response = api.get_collection_items(4, query).await.unwrap();
    assert!(response.items.is_empty());
}

#[tokio::test]
async fn error_responses_are_normalised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/CollectionsApi/items/1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Item not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/CollectionsApi/items/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is down"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/CollectionsApi/items/3/like"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in());

    let missing = api.get_item(1).await.unwrap_err();
    assert_eq!((missing.message.as_str(), missing.status), ("Item not found", 404));
    assert!(missing.is_not_found());

    let broken = api.get_item(2).await.unwrap_err();
    assert_eq!((broken.message.as_str(), broken.status), ("database is down", 500));

    let expired = api.like(3).await.unwrap_err();
    assert_eq!((expired.message.as_str(), expired.status), ("Unauthorized", 401));
    assert!(expired.is_unauthorized());
}

#[tokio::test]
async fn undecodable_success_body_is_not_a_server_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/CollectionsApi/items/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in());
    let error = api.get_item(5).await.unwrap_err();

    assert_eq!(error.status, 0);
    assert!(error.is_transport());
    assert!(error.message.starts_with("Invalid response body"));
}

#[tokio::test]
async fn transport_failures_have_status_zero() {
    let base = Url::parse("http://127.0.0.1:9/CollectionsApi").unwrap();
    let api = HttpApi::new(base, Arc::new(InMemoryStorage::new()));

    let error = api.topics().await.unwrap_err();

    assert_eq!(error.status, 0);
    assert!(error.is_transport());
}
