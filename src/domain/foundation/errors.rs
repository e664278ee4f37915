//! Error types for the domain layer.

use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field } => field,
            ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Coarse failure taxonomy a client can branch on.
///
/// `PreconditionFailed` means "the session is there but the action does not
/// apply right now"; `NotFound` means "this session (or connection) is gone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    PreconditionFailed,
    Invalid,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{}", s)
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    SessionNotFound,
    ConnectionNotFound,

    // Precondition errors
    SessionAlreadyExists,
    SessionNotJoinable,
    GameNotActive,
    NotParticipant,
    NotYourTurn,
    IllegalPosition,

    // Infrastructure errors
    SerializationError,
    FeedClosed,
    InternalError,
}

impl ErrorCode {
    /// Category this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::ValidationFailed => ErrorKind::Invalid,
            ErrorCode::SessionNotFound | ErrorCode::ConnectionNotFound => ErrorKind::NotFound,
            ErrorCode::SessionAlreadyExists
            | ErrorCode::SessionNotJoinable
            | ErrorCode::GameNotActive
            | ErrorCode::NotParticipant
            | ErrorCode::NotYourTurn
            | ErrorCode::IllegalPosition => ErrorKind::PreconditionFailed,
            ErrorCode::SerializationError | ErrorCode::FeedClosed | ErrorCode::InternalError => {
                ErrorKind::Internal
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::ConnectionNotFound => "CONNECTION_NOT_FOUND",
            ErrorCode::SessionAlreadyExists => "SESSION_ALREADY_EXISTS",
            ErrorCode::SessionNotJoinable => "SESSION_NOT_JOINABLE",
            ErrorCode::GameNotActive => "GAME_NOT_ACTIVE",
            ErrorCode::NotParticipant => "NOT_PARTICIPANT",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::IllegalPosition => "ILLEGAL_POSITION",
            ErrorCode::SerializationError => "SERIALIZATION_ERROR",
            ErrorCode::FeedClosed => "FEED_CLOSED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
