//! Liveness endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::adapters::websocket::ConnectionRegistry;
use crate::ports::SessionRegistry;

use super::game::HealthResponse;

#[derive(Clone)]
pub struct HealthState {
    pub sessions: Arc<dyn SessionRegistry>,
    pub connections: Arc<ConnectionRegistry>,
}

/// GET /health - Process is up; reports live session and observer counts
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.sessions.len().await,
        connections: state.connections.total_connections().await,
    })
}

pub fn health_routes(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
