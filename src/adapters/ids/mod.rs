//! Identifier generator adapters.

use uuid::Uuid;

use crate::domain::foundation::SessionId;
use crate::ports::IdGenerator;

/// Random UUID v4 session ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> SessionId {
        SessionId::from_uuid(Uuid::new_v4())
    }
}
