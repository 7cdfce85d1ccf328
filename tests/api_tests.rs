//! Drives the router end to end over the in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use searchvault::api::{AppState, create_router};
use searchvault::gemini::{GenerationConfig, TextGenerator};
use searchvault::resolver::SourceResolver;
use searchvault::service::SearchService;
use searchvault::store::MemoryStore;

struct CannedGenerator(&'static str);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str, _config: GenerationConfig) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn spawn_app_with(resolver: SourceResolver) -> Router {
    let search = SearchService::new(Arc::new(MemoryStore::new()));
    create_router(Arc::new(AppState::new(search, resolver)))
}

fn spawn_app() -> Router {
    spawn_app_with(SourceResolver::unconfigured())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create(app: &Router, user_id: &str, query: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/search",
        Some(json!({
            "userId": user_id,
            "query": query,
            "platforms": ["reddit"],
            "result": { "redditUrl": "https://reddit.com/r/x", "extra": [1, 2, 3] }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_create_search() {
    let app = spawn_app();

    let body = create(&app, "u1", "rust").await;
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["id"].as_str().unwrap().len(), 24);
    assert_eq!(data["userId"], "u1");
    assert_eq!(data["query"], "rust");
    assert_eq!(data["platforms"], json!(["reddit"]));
    assert_eq!(data["result"]["extra"], json!([1, 2, 3]));
    assert!(data["createdAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(data["createdAt"], data["updatedAt"]);
}

#[tokio::test]
async fn test_create_accepts_gemini_result_alias() {
    let app = spawn_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/search",
        Some(json!({
            "userId": "u1",
            "query": "rust",
            "geminiResult": { "youtubeUrl": "https://youtube.com/@rust" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["result"]["youtubeUrl"], "https://youtube.com/@rust");
    assert_eq!(body["data"]["platforms"], json!([]));
}

#[tokio::test]
async fn test_create_missing_field_is_bad_request() {
    let app = spawn_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/search",
        Some(json!({ "userId": "u1", "result": {} })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Missing required fields"));

    let (_, history) = send(&app, Method::GET, "/api/search/history/u1", None).await;
    assert_eq!(history["count"], 0);
}

#[tokio::test]
async fn test_create_invalid_json_is_bad_request() {
    let app = spawn_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/search")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_history_newest_first_without_result() {
    let app = spawn_app();
    for query in ["first", "second", "third"] {
        create(&app, "u1", query).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/search/history/u1?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["query"], "third");
    assert_eq!(data[1]["query"], "second");
    for summary in data {
        assert!(summary.get("result").is_none());
        assert!(summary.get("userId").is_none());
        assert!(summary.get("createdAt").is_some());
        assert_eq!(summary["platforms"], json!(["reddit"]));
    }
}

#[tokio::test]
async fn test_history_alias_route() {
    let app = spawn_app();
    create(&app, "u1", "rust").await;

    let (_, canonical) = send(&app, Method::GET, "/api/search/history/u1", None).await;
    let (status, alias) = send(&app, Method::GET, "/api/history/u1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(alias, canonical);
    assert_eq!(alias["count"], 1);
}

#[tokio::test]
async fn test_history_invalid_limit() {
    let app = spawn_app();
    let (status, body) = send(&app, Method::GET, "/api/search/history/u1?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_and_delete_search() {
    let app = spawn_app();
    let created = create(&app, "u1", "rust").await;
    let id = created["data"]["id"].as_str().unwrap();
    let uri = format!("/api/search/{id}");

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created["data"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Search deleted" }));

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Search not found" }));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = spawn_app();
    let (status, body) = send(&app, Method::GET, "/api/search/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = spawn_app();
    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Route not found" }));
}

#[tokio::test]
async fn test_resolve_without_credential() {
    let app = spawn_app();
    let (status, body) = send(&app, Method::POST, "/api/resolve", Some(json!({ "query": "rust" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_resolve_with_generator() {
    let app = spawn_app_with(SourceResolver::new(Arc::new(CannedGenerator(
        "Sure! {\"redditUrl\":\"https://reddit.com/r/x\"} Thanks",
    ))));

    let (status, body) = send(&app, Method::POST, "/api/resolve", Some(json!({ "query": "x" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "redditUrl": "https://reddit.com/r/x",
                "youtubeUrl": "",
                "instagramUrl": "",
                "linkedinUrl": ""
            }
        })
    );

    let (status, _) = send(&app, Method::POST, "/api/resolve", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_malformed_reply_is_bad_gateway() {
    let app = spawn_app_with(SourceResolver::new(Arc::new(CannedGenerator("no json"))));
    let (status, body) = send(&app, Method::POST, "/api/resolve", Some(json!({ "query": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Gemini did not return JSON");
}

#[tokio::test]
async fn test_wrong_method_on_known_path_is_route_not_found() {
    let app = spawn_app();
    let created = create(&app, "u1", "rust").await;
    let id = created["data"]["id"].as_str().unwrap();
    let route_not_found = json!({ "success": false, "error": "Route not found" });

    let cases = [
        (Method::PUT, format!("/api/search/{id}")),
        (Method::GET, "/api/search".to_string()),
        (Method::POST, "/health".to_string()),
        (Method::DELETE, "/api/history/u1".to_string()),
        (Method::GET, "/api/resolve".to_string()),
    ];
    for (method, uri) in cases {
        let (status, body) = send(&app, method.clone(), &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, route_not_found, "{method} {uri}");
    }

    // The record is untouched by the unmatched PUT.
    let (status, _) = send(&app, Method::GET, &format!("/api/search/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_history_bad_query_string_uses_error_envelope() {
    let app = spawn_app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/search/history/u1?limit=1&limit=2",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());
}
