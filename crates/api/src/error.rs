use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ludex_core::error::CoreError;
use ludex_ingest::IngestError;
use ludex_steam::client::SteamError;
use ludex_store::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain error enums of the workspace crates and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error", "code" }` JSON error responses; upstream and
/// persistence failures additionally carry a `details` field naming what
/// failed, never an internal filesystem path.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Steam(#[from] SteamError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// (status, code, message, optional details)
type ErrorParts = (StatusCode, &'static str, String, Option<String>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = classify(&self);

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify(err: &AppError) -> ErrorParts {
    match err {
        AppError::Core(core) => classify_core(core),
        AppError::Store(store) => classify_store(store),
        AppError::Steam(steam) => classify_steam(steam),
        AppError::Ingest(ingest) => classify_ingest(ingest),
        AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
        AppError::InternalError(msg) => {
            tracing::error!(error = %msg, "Internal error");
            internal_error()
        }
    }
}

fn classify_core(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
            None,
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            msg.clone(),
            None,
        ),
        CoreError::Upstream(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "UPSTREAM_ERROR",
            "Error fetching storefront data".to_string(),
            Some(msg.clone()),
        ),
        CoreError::Persistence { layer, message } => {
            tracing::error!(layer, error = %message, "Persistence failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                format!("Failed to write to the {layer}"),
                None,
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal_error()
        }
    }
}

/// Persistence failures name which write layer failed without leaking
/// server-side paths.
fn classify_store(err: &StoreError) -> ErrorParts {
    match err {
        StoreError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Game with id {id} not found"),
            None,
        ),
        StoreError::InvalidRecord(msg) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            msg.clone(),
            None,
        ),
        StoreError::Manifest { folder, .. } => {
            tracing::error!(error = %err, "Manifest write failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Failed to write the game manifest".to_string(),
                Some(format!("manifest for '{folder}'")),
            )
        }
        StoreError::Assets { folder, .. } => {
            tracing::error!(error = %err, "Asset folder removal failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Failed to remove the game's asset folder".to_string(),
                Some(format!("assets for '{folder}'")),
            )
        }
        StoreError::IndexRead(_) | StoreError::IndexWrite(_) | StoreError::Corrupt(_) => {
            tracing::error!(error = %err, "Catalog index failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Failed to access the catalog index".to_string(),
                Some("catalog index".to_string()),
            )
        }
    }
}

fn classify_steam(err: &SteamError) -> ErrorParts {
    tracing::error!(error = %err, "Storefront failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "UPSTREAM_ERROR",
        "Error fetching storefront data".to_string(),
        Some(err.to_string()),
    )
}

fn classify_ingest(err: &IngestError) -> ErrorParts {
    match err {
        IngestError::UnknownApp(app_id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Storefront has no app with id {app_id}"),
            None,
        ),
        IngestError::Upstream(steam) => classify_steam(steam),
        IngestError::Layout(io) => {
            tracing::error!(error = %io, "Game directory creation failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Failed to create the game's asset directories".to_string(),
                None,
            )
        }
        IngestError::Store(store) => classify_store(store),
        IngestError::Invalid(core) => classify_core(core),
    }
}

fn internal_error() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
