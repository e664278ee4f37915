//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{
    DomainError, ErrorCode, ErrorKind, ParticipantId, SessionId, ValidationError,
};
use crate::domain::game::Position;

/// Session-specific errors.
///
/// Every variant maps to a stable [`ErrorCode`] so transports can tell
/// "try again" apart from "this session is gone".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session was not found.
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    /// A session with this id is already registered.
    #[error("Session already exists: {0}")]
    AlreadyExists(SessionId),
    /// Join rejected (not waiting, full, or same participant).
    #[error("Session cannot be joined: {0}")]
    NotJoinable(String),
    /// Move attempted while the session is waiting or finished.
    #[error("Game is not active")]
    GameNotActive,
    /// Actor is not one of the session's participants.
    #[error("Not a participant of this session: {0}")]
    NotParticipant(ParticipantId),
    /// Actor is a participant but does not hold the turn.
    #[error("It's not your turn")]
    NotYourTurn,
    /// Rules engine rejected the target cell.
    #[error("Illegal position {0}")]
    IllegalPosition(Position),
    /// Validation failed.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    #[error("Error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }
    pub fn not_joinable(reason: impl Into<String>) -> Self {
        SessionError::NotJoinable(reason.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::AlreadyExists(_) => ErrorCode::SessionAlreadyExists,
            SessionError::NotJoinable(_) => ErrorCode::SessionNotJoinable,
            SessionError::GameNotActive => ErrorCode::GameNotActive,
            SessionError::NotParticipant(_) => ErrorCode::NotParticipant,
            SessionError::NotYourTurn => ErrorCode::NotYourTurn,
            SessionError::IllegalPosition(_) => ErrorCode::IllegalPosition,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        SessionError::Infrastructure(err.to_string())
    }
}
