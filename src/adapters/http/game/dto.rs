//! HTTP DTOs for game endpoints.
//!
//! Successful calls answer with the session snapshot itself; these types
//! cover request parsing and the error body.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorKind;
use crate::domain::session::SessionError;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// `?playerID=` query parameter naming the acting participant.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerQuery {
    #[serde(rename = "playerID")]
    pub player_id: String,
}

/// Body of a move request.
///
/// Coordinates are signed so that negative values reach validation instead
/// of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub username: String,
    pub x: i64,
    pub y: i64,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Error body for every failed game call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            kind: ErrorKind::Invalid.to_string(),
            message: message.into(),
        }
    }
}

impl From<&SessionError> for ErrorResponse {
    fn from(error: &SessionError) -> Self {
        Self::new(error.code(), error.kind(), error.to_string())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
    pub connections: usize,
}
