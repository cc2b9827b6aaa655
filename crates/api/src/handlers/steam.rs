//! Handlers for storefront lookups and storefront-driven game creation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use ludex_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /steam/{app_id}
// ---------------------------------------------------------------------------

/// Proxy a storefront metadata lookup, returning the raw app document.
///
/// The browser cannot call the storefront directly (CORS), so the frontend
/// routes lookups through here.
pub async fn lookup_app(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let data = state.steam.fetch_app(&app_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Storefront app",
            id: app_id.clone(),
        })
    })?;

    Ok(Json(data))
}

// ---------------------------------------------------------------------------
// POST /games/steam
// ---------------------------------------------------------------------------

/// Create (or refresh) a catalog entry from a storefront app.
///
/// Body: `{ "gameData": { "steamAppId": "...", ...overrides } }`. The
/// overrides are merged onto the normalized record; asset-URL fields are
/// server-derived and silently ignored if supplied.
pub async fn create_from_steam(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let game_data = body
        .get("gameData")
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Missing gameData in request body".to_string()))?;

    let app_id = match game_data.get("steamAppId") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => {
            return Err(AppError::BadRequest(
                "Missing steamAppId in gameData".to_string(),
            ))
        }
    };

    let outcome = state.ingestor.ingest(&app_id, Some(game_data)).await?;

    tracing::info!(
        app_id = %app_id,
        downloaded = outcome.downloaded_count(),
        failed = outcome.failed_count(),
        "Game created from storefront"
    );
    Ok(Json(json!({
        "success": true,
        "message": "Game created successfully",
        "game": outcome.game,
    })))
}
