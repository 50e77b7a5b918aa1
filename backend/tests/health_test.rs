//! Integration tests for health check and root endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "alive");
}

#[tokio::test]
async fn test_readiness_endpoint() {
    let app = TestApp::new();

    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_root() {
    let app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["Hello"], "World");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "fixed-request-id")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.request(request).await;

    assert_eq!(response.headers.get("x-request-id").unwrap(), "fixed-request-id");
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/auth/login/access-token")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.request(request).await;

    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}
