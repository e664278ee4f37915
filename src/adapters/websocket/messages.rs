//! WebSocket message types for live game observation.
//!
//! Defines the protocol between server and connected observers:
//! - Server → Client: Game state, errors, pongs
//! - Client → Server: Pings, state requests

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::session::SessionSnapshot;

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full game state; snapshot fields are inlined next to `type`.
    State(SessionSnapshot),

    /// Error occurred.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl ServerMessage {
    pub fn state(snapshot: SessionSnapshot) -> Self {
        ServerMessage::State(snapshot)
    }

    pub fn error(code: impl ToString, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.to_string(),
            message: message.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    /// Encode as a JSON text frame that can be shared across connections.
    pub fn encode(&self) -> Result<Arc<str>, DomainError> {
        serde_json::to_string(self)
            .map(Arc::from)
            .map_err(|e| DomainError::new(ErrorCode::SerializationError, e.to_string()))
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,

    /// Re-send the current game state to this connection only.
    #[serde(rename = "request.state")]
    RequestState,
}
