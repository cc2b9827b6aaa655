//! Health check handler.

use axum::Json;
use serde_json::json;

/// GET /health
///
/// Liveness probe; reports the running version.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
