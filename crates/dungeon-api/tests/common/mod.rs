//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dungeon_core::clock::Clock;
use dungeon_test_support::{FixedClock, builtin_presentation, builtin_registry};
use http_body_util::BodyExt;
use tower::ServiceExt;

use dungeon_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Application state over the built-in content with a fixed clock.
///
/// Clone it into each `build_test_app` call so sessions persist across
/// requests.
pub fn test_state() -> AppState {
    let registry = builtin_registry();
    let presentation = builtin_presentation(&registry);
    AppState::new(registry, presentation, fixed_clock())
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    dungeon_api::build_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Start a session and return its id.
pub async fn start_session(state: &AppState) -> String {
    let (status, json) = post_empty(build_test_app(state.clone()), "/api/v1/sessions").await;
    assert_eq!(status, StatusCode::OK);
    json["session"]["session_id"].as_str().unwrap().to_owned()
}

/// Take a choice and return the response.
pub async fn choose(
    state: &AppState,
    session_id: &str,
    action_id: &str,
) -> (StatusCode, serde_json::Value) {
    post_json(
        build_test_app(state.clone()),
        &format!("/api/v1/sessions/{session_id}/choose"),
        &serde_json::json!({ "action_id": action_id }),
    )
    .await
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap().status()
}
