//! Handlers for the game catalog: list, get, update, delete, and file
//! uploads.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use ludex_core::error::CoreError;
use ludex_core::files::{classify_file, upsert_download_file, DownloadFile};
use ludex_core::game::{merge_update, GameRecord};
use ludex_core::paths::validate_upload_filename;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up a game by id, mapping absence to a 404.
async fn ensure_game_exists(state: &AppState, id: &str) -> AppResult<GameRecord> {
    state.store.get(id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Game",
            id: id.to_string(),
        })
    })
}

// ---------------------------------------------------------------------------
// GET /games
// ---------------------------------------------------------------------------

/// Full catalog, in index order. The bare-array shape is the legacy wire
/// format the frontend expects.
pub async fn list_games(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let games = state.store.all().await?;
    Ok(Json(games))
}

// ---------------------------------------------------------------------------
// GET /games/{id}
// ---------------------------------------------------------------------------

/// Single record by id.
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let game = ensure_game_exists(&state, &id).await?;
    Ok(Json(game))
}

// ---------------------------------------------------------------------------
// PUT /games/{id}
// ---------------------------------------------------------------------------

/// Merge a partial update onto an existing record.
///
/// `id` and `folder` are immutable; the rest of the body shallow-merges
/// field by field. The manifest mirror is rewritten as part of the upsert.
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_game_exists(&state, &id).await?;
    let updated = merge_update(&existing, patch)?;
    state.store.upsert(&updated).await?;

    tracing::info!(id = %id, "Game updated");
    Ok(Json(json!({
        "success": true,
        "message": "Game updated successfully",
        "game": updated,
    })))
}

// ---------------------------------------------------------------------------
// DELETE /games/{id}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// `?removeFiles=true` also deletes the game's asset folder.
    #[serde(rename = "removeFiles", default)]
    pub remove_files: bool,
}

/// Remove a game from the catalog, optionally cascading to its assets.
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> AppResult<impl IntoResponse> {
    state.store.remove(&id, params.remove_files).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Game deleted successfully",
    })))
}

// ---------------------------------------------------------------------------
// POST /games/{id}/files
// ---------------------------------------------------------------------------

/// Accept a multipart upload of download files into the game's folder.
///
/// Each part is streamed to disk chunk by chunk (the request body is
/// already bounded by the configured size limit, and the stream is
/// re-checked while writing). Files are classified by extension and
/// upserted into `downloadFiles` keyed by filename, so re-uploading
/// `patch.zip` replaces its entry rather than duplicating it.
pub async fn upload_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut game = ensure_game_exists(&state, &id).await?;
    let game_dir = state.store.game_dir(&game.folder);

    let mut results = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            // Non-file form fields are ignored.
            continue;
        };
        validate_upload_filename(&filename)?;

        let dest = game_dir.join(&filename);
        let size = stream_field_to_file(&mut field, &dest, state.config.max_upload_bytes).await?;

        let entry = DownloadFile {
            name: filename.clone(),
            filename: filename.clone(),
            size,
            kind: classify_file(&filename),
        };
        results.push(json!({
            "filename": entry.filename.clone(),
            "size": entry.size,
            "type": entry.kind,
        }));
        upsert_download_file(&mut game.download_files, entry);

        tracing::info!(id = %id, filename = %filename, size, "Download file stored");
    }

    if results.is_empty() {
        return Err(AppError::BadRequest("No files were uploaded".to_string()));
    }

    state.store.upsert(&game).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Files uploaded successfully",
        "files": results,
    })))
}

/// Stream one multipart field to `dest`, returning the byte count.
///
/// Aborts (and removes the partial file) if the field exceeds `max_bytes`.
async fn stream_field_to_file(
    field: &mut axum::extract::multipart::Field<'_>,
    dest: &std::path::Path,
    max_bytes: usize,
) -> AppResult<u64> {
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload file: {e}")))?;

    let mut written: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                let _ = tokio::fs::remove_file(dest).await;
                return Err(AppError::BadRequest(e.to_string()));
            }
        };

        written += chunk.len() as u64;
        if written > max_bytes as u64 {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(AppError::BadRequest(format!(
                "Upload exceeds the maximum size of {max_bytes} bytes"
            )));
        }

        if let Err(e) = file.write_all(&chunk).await {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(AppError::InternalError(format!(
                "Failed to write upload: {e}"
            )));
        }
    }

    file.flush()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to flush upload: {e}")))?;
    Ok(written)
}
