//! Route definitions for storefront integration.
//!
//! ```text
//! GET  /steam/{app_id}   -> lookup_app (metadata proxy)
//! POST /games/steam      -> create_from_steam (runs ingestion)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::steam;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/steam/{app_id}", get(steam::lookup_app))
        .route("/games/steam", post(steam::create_from_steam))
}
