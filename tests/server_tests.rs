#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use project_muse::agents::{StreamingCallback, SuggestError, SuggestionEngine};
use project_muse::github::validate_username;
use project_muse::server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

const FUNCTION_PATH: &str = "/githubProjectSuggestFunction";

/// Engine that streams a canned suggestion in two chunks, or fails on demand
struct StubEngine {
    fail_with: Option<fn() -> SuggestError>,
}

#[async_trait]
impl SuggestionEngine for StubEngine {
    async fn suggest(
        &self,
        username: &str,
        callback: &dyn StreamingCallback,
    ) -> Result<String, SuggestError> {
        let username = validate_username(username)?;
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }

        let first = format!("Title: Dotfiles doctor for {username}\n");
        let second = "Why: You tinker with shell configs.";
        callback
            .on_chunk(&first)
            .await
            .map_err(|e| SuggestError::Cancelled(e.to_string()))?;
        callback
            .on_chunk(second)
            .await
            .map_err(|e| SuggestError::Cancelled(e.to_string()))?;
        Ok(format!("{first}{second}"))
    }
}

fn app(fail_with: Option<fn() -> SuggestError>) -> axum::Router {
    let engine: Arc<dyn SuggestionEngine> = Arc::new(StubEngine { fail_with });
    router(AppState::new(engine), FUNCTION_PATH)
}

fn call(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(FUNCTION_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_callable_returns_result_envelope() {
    let response = app(None)
        .oneshot(call(&json!({"data": {"username": "octocat"}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["result"],
        "Title: Dotfiles doctor for octocat\nWhy: You tinker with shell configs."
    );
}

#[tokio::test]
async fn test_missing_data_envelope_is_invalid_argument() {
    let response = app(None)
        .oneshot(call(&json!({"username": "octocat"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_invalid_username_is_invalid_argument() {
    let response = app(None)
        .oneshot(call(&json!({"data": {"username": "not a user"}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_tool_failure_is_internal_without_partial_result() {
    let response = app(Some(|| {
        SuggestError::Tool("Failed to fetch repos from GitHub: Not Found".to_string())
    }))
    .oneshot(call(&json!({"data": {"username": "octocat"}})))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["status"], "INTERNAL");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Not Found")
    );
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_streaming_sends_chunks_then_result() {
    let mut request = call(&json!({"data": {"username": "octocat"}}));
    request.headers_mut().insert(
        header::ACCEPT,
        "text/event-stream".parse().unwrap(),
    );

    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let events: Vec<Value> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).unwrap())
        .collect();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["message"], "Title: Dotfiles doctor for octocat\n");
    assert_eq!(events[1]["message"], "Why: You tinker with shell configs.");
    assert!(
        events[2]["result"]
            .as_str()
            .unwrap()
            .starts_with("Title: Dotfiles doctor")
    );
}

#[tokio::test]
async fn test_streaming_failure_ends_with_error_event() {
    let mut request = call(&json!({"data": {"username": "octocat"}}));
    request.headers_mut().insert(
        header::ACCEPT,
        "text/event-stream".parse().unwrap(),
    );

    let response = app(Some(|| SuggestError::EmptyResponse))
        .oneshot(request)
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let last: Value = text
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .last()
        .map(|data| serde_json::from_str(data).unwrap())
        .unwrap();

    assert_eq!(last["error"]["status"], "INTERNAL");
}

#[tokio::test]
async fn test_health_check() {
    let response = app(None)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri(FUNCTION_PATH)
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
