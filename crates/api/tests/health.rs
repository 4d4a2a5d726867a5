//! Integration tests for the health check endpoint and general HTTP behaviour.
//!
//! The renderer is a shell script, so these run on Unix only.
#![cfg(unix)]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, FailingGenerator, RENDERING_CLI};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health reports an available renderer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_renderer_version() {
    let test_app = common::build_test_app(RENDERING_CLI, Arc::new(FailingGenerator));
    let response = get(test_app.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["renderer_available"], true);
    assert_eq!(json["renderer_version"], "Manim Community v0.18.1");
}

// ---------------------------------------------------------------------------
// Test: GET /health is degraded when Manim cannot be spawned
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_degraded_without_renderer() {
    let test_app = common::build_app_without_renderer(Arc::new(FailingGenerator));
    let response = get(test_app.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["renderer_available"], false);
    assert!(json.get("renderer_version").is_none());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let test_app = common::build_test_app(RENDERING_CLI, Arc::new(FailingGenerator));
    let response = get(test_app.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let test_app = common::build_test_app(RENDERING_CLI, Arc::new(FailingGenerator));
    let response = get(test_app.app(), "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight for the generate endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let test_app = common::build_test_app(RENDERING_CLI, Arc::new(FailingGenerator));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/generate")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = test_app.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
    let methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"), "allowed methods: {methods}");
}

// ---------------------------------------------------------------------------
// Test: Unlisted origins get no CORS grant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_rejects_unlisted_origin() {
    let test_app = common::build_test_app(RENDERING_CLI, Arc::new(FailingGenerator));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("Origin", "http://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = test_app.app().oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
