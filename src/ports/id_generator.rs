//! IdGenerator port - source of new session identifiers.

use crate::domain::foundation::SessionId;

/// Port for minting opaque, unique session identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier never handed out before by this generator.
    fn new_id(&self) -> SessionId;
}
