//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of every other module.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use ids::{ConnectionId, ParticipantId, SessionId};
pub use timestamp::Timestamp;
