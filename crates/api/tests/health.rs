//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let harness = common::build_test_app().await;
    let response = get(harness.app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: unmatched paths fall through to static serving, then 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_path_returns_404() {
    let harness = common::build_test_app().await;
    let response = get(harness.app, "/this-file-does-not-exist.html").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_files_are_served_from_the_data_dir() {
    let harness = common::build_test_app().await;
    std::fs::write(harness.data_dir.path().join("index.html"), "<h1>portal</h1>").unwrap();

    let response = get(harness.app, "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let harness = common::build_test_app().await;
    let response = get(harness.app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(
        request_id.to_str().unwrap().len(),
        36,
        "x-request-id should be a UUID string"
    );
}
