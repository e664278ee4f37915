//! HTTP adapters - REST API implementations.
//!
//! - `game` - Create, join, move, restart and state endpoints
//! - `health` - Liveness and counters

pub mod game;
pub mod health;

pub use game::{game_routes, GameHandlers};
pub use health::{health_routes, HealthState};
