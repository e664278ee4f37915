//! GetSessionHandler - Query handler for the current session state.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::{SessionError, SessionSnapshot};
use crate::ports::SessionRegistry;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving session state.
pub struct GetSessionHandler {
    registry: Arc<dyn SessionRegistry>,
}

impl GetSessionHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionSnapshot, SessionError> {
        self.registry.get(&query.session_id).await
    }
}
