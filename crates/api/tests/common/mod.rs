//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! over a temporary data directory, and provides small request helpers on
//! top of `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use ludex_api::config::ServerConfig;
use ludex_api::router::build_app_router;
use ludex_api::state::AppState;
use ludex_ingest::Ingestor;
use ludex_steam::client::StorefrontClient;
use ludex_steam::fetch::AssetFetcher;
use ludex_store::CatalogStore;

/// A running test application plus handles to poke at its internals.
pub struct TestApp {
    /// Keeps the temporary data directory alive for the test's duration.
    pub data_dir: TempDir,
    pub app: Router,
    pub store: Arc<CatalogStore>,
}

/// Build a test `ServerConfig` rooted at `data_dir`.
///
/// The storefront URL points at a closed port; tests that need a live
/// storefront spin up their own mock server and override it.
pub fn test_config(data_dir: &std::path::Path, steam_api_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        data_dir: data_dir.to_path_buf(),
        steam_api_url: steam_api_url.to_string(),
        fetch_timeout_secs: 5,
        max_upload_bytes: 64 * 1024 * 1024,
    }
}

/// Build the full application over a fresh temporary data directory.
pub async fn build_test_app() -> TestApp {
    build_test_app_with_storefront("http://127.0.0.1:9").await
}

/// Build the full application with a caller-supplied storefront URL.
pub async fn build_test_app_with_storefront(steam_api_url: &str) -> TestApp {
    let data_dir = TempDir::new().expect("temp data dir");
    let config = test_config(data_dir.path(), steam_api_url);

    let store = Arc::new(
        CatalogStore::open(data_dir.path())
            .await
            .expect("catalog store"),
    );
    let fetch_timeout = Duration::from_secs(config.fetch_timeout_secs);
    let steam = Arc::new(
        StorefrontClient::new(&config.steam_api_url, fetch_timeout).expect("storefront client"),
    );
    let fetcher = Arc::new(AssetFetcher::new(fetch_timeout).expect("asset fetcher"));
    let ingestor = Arc::new(Ingestor::new(
        Arc::clone(&store),
        Arc::clone(&steam),
        fetcher,
    ));

    let state = AppState {
        store: Arc::clone(&store),
        steam,
        ingestor,
        config: Arc::new(config.clone()),
    };

    TestApp {
        data_dir,
        app: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a hand-built multipart body. Each part is `(filename, bytes)`.
pub async fn post_multipart(app: Router, uri: &str, parts: &[(&str, &[u8])]) -> Response<Body> {
    const BOUNDARY: &str = "----ludex-test-boundary";

    let mut body = Vec::new();
    for (filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body was not JSON: {e}: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Assert the `{ "error", "code" }` error envelope.
pub async fn assert_error_body(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
