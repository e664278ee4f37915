//! HTTP routes for game endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_game, get_game_state, join_game, make_move, restart_game, GameHandlers,
};

/// Creates the game router with all endpoints.
pub fn game_routes(handlers: GameHandlers) -> Router {
    Router::new()
        .route("/game/create", post(create_game))
        .route("/game/:game_id/join", post(join_game))
        .route("/game/:game_id/move", post(make_move))
        .route("/game/:game_id/restart", post(restart_game))
        .route("/game/:game_id/state", get(get_game_state))
        .with_state(handlers)
}
