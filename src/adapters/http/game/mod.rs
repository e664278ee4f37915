//! HTTP adapter for game endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, HealthResponse, MoveRequest, PlayerQuery};
pub use handlers::{status_for, GameHandlers};
pub use routes::game_routes;
