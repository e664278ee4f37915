//! Session observation: subscribe first, then read the current state.
//!
//! Registering before reading guarantees no committed change falls between
//! the initial snapshot and the first live delivery. Deliveries that are not
//! newer than the initial snapshot are filtered by the [`Subscription`].

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::{SessionError, SessionSnapshot};
use crate::ports::SessionRegistry;

use super::connections::{ConnectionHandle, ConnectionRegistry, Subscription};

/// A live observation of one session.
#[derive(Debug)]
pub struct Observation {
    pub handle: ConnectionHandle,
    pub subscription: Subscription,
    /// State at the moment of subscribing; send this first.
    pub snapshot: SessionSnapshot,
}

/// Opens and closes observations against the two registries.
///
/// Never holds a session lock and the connection registry lock at the same
/// time.
pub struct SessionObserver {
    sessions: Arc<dyn SessionRegistry>,
    connections: Arc<ConnectionRegistry>,
}

impl SessionObserver {
    pub fn new(sessions: Arc<dyn SessionRegistry>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            sessions,
            connections,
        }
    }

    /// Start observing `session_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist; nothing stays registered
    pub async fn observe(&self, session_id: SessionId) -> Result<Observation, SessionError> {
        let (handle, mut subscription) = self.connections.subscribe(session_id.clone()).await;

        match self.sessions.get(&session_id).await {
            Ok(snapshot) => {
                subscription.mark_seen(snapshot.version);
                Ok(Observation {
                    handle,
                    subscription,
                    snapshot,
                })
            }
            Err(e) => {
                self.release(&handle).await;
                Err(e)
            }
        }
    }

    /// Current state, read outside the feed path.
    pub async fn current(&self, session_id: &SessionId) -> Result<SessionSnapshot, SessionError> {
        self.sessions.get(session_id).await
    }

    /// Stop observing. Releasing twice is harmless.
    pub async fn release(&self, handle: &ConnectionHandle) {
        if let Err(e) = self.connections.unsubscribe(handle).await {
            tracing::debug!(connection_id = %handle.connection_id, error = %e, "Release skipped");
        }
    }

    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }

    pub fn sessions(&self) -> &Arc<dyn SessionRegistry> {
        &self.sessions
    }
}
