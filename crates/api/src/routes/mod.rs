pub mod games;
pub mod health;
pub mod steam;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /games                       list
/// /games/steam                 ingest from storefront (POST)
/// /games/{id}                  get, update, delete
/// /games/{id}/files            upload download files (POST)
/// /steam/{app_id}              storefront metadata proxy (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(games::router())
        .merge(steam::router())
}
