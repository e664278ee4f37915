//! In-process session registry.
//!
//! # Architecture
//!
//! ```text
//! RwLock<HashMap>                      per-session Mutex
//! ├── game-123 ──► Arc<Mutex<Session>> ──► OwnedMutexGuard (one holder)
//! └── game-456 ──► Arc<Mutex<Session>>
//! ```
//!
//! The map lock is held only long enough to find or insert an entry; the
//! session's own mutex is what serializes mutations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{ParticipantId, SessionId, Timestamp};
use crate::domain::game::Board;
use crate::domain::session::{Session, SessionError, SessionSnapshot};
use crate::ports::{SessionGuard, SessionRegistry};

/// Session registry backed by a map of per-session mutexes.
///
/// # Thread Safety
///
/// Uses `RwLock` for the map since lookups vastly outnumber creations, and
/// a `Mutex` per session so different sessions never contend.
pub struct InMemorySessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl InMemorySessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// All registered ids (for monitoring/debugging).
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn create(
        &self,
        id: SessionId,
        first: ParticipantId,
        board: Board,
    ) -> Result<SessionGuard, SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(SessionError::AlreadyExists(id));
        }

        let cell = Arc::new(Mutex::new(Session::new(id.clone(), first, board)));
        // Locked before it becomes visible, so the creator commits first.
        let guard = Arc::clone(&cell).lock_owned().await;
        sessions.insert(id, cell);
        Ok(guard)
    }

    async fn lock(&self, id: &SessionId) -> Result<SessionGuard, SessionError> {
        let cell = self
            .sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::not_found(id.clone()))?;
        Ok(cell.lock_owned().await)
    }

    async fn get(&self, id: &SessionId) -> Result<SessionSnapshot, SessionError> {
        let session = self.lock(id).await?;
        Ok(session.snapshot())
    }

    /// Sessions someone holds or is waiting to lock are never evicted: the
    /// map's write lock stops new lookups, so any extra `Arc` belongs to a
    /// caller between `lock` and its commit.
    async fn evict_idle(&self, cutoff: Timestamp) -> Vec<SessionId> {
        let mut sessions = self.sessions.write().await;
        let stale: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, cell)| Arc::strong_count(cell) == 1)
            .filter_map(|(id, cell)| {
                let session = cell.try_lock().ok()?;
                session
                    .updated_at()
                    .is_before(&cutoff)
                    .then(|| id.clone())
            })
            .collect();

        for id in &stale {
            sessions.remove(id);
        }
        stale
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
