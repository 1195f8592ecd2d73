//! Health Check and Metrics API Tests

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health/live", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_in_memory_store() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health/ready", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "healthy");
    assert_eq!(body["checks"]["database"]["message"], "in-memory store");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_metrics_exposes_request_counters() {
    let app = TestApp::new();
    app.request(Method::GET, "/health", None, None).await;

    let (status, body) = app.request(Method::GET, "/metrics", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().expect("metrics are plain text");
    assert!(text.contains("messenger_http_requests_total"));
    assert!(text.contains("path=\"/health\""));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();

    let (status, _) = app.request(Method::GET, "/api/v1/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
