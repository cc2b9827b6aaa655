//! Route definitions for the game catalog.
//!
//! ```text
//! GET    /games              -> list_games
//! GET    /games/{id}         -> get_game
//! PUT    /games/{id}         -> update_game
//! DELETE /games/{id}         -> delete_game
//! POST   /games/{id}/files   -> upload_files
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::games;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::list_games))
        .route(
            "/games/{id}",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        .route("/games/{id}/files", post(games::upload_files))
}
