//! SessionRegistry port - exclusive owner of all live sessions.
//!
//! # Design
//!
//! - **Guard-only access**: a session is reachable only through the owned
//!   guard returned by `create` or `lock`; no reference escapes without the
//!   session's exclusion held
//! - **Per-session exclusion**: mutations of one session never interleave,
//!   different sessions proceed in parallel
//! - **No implicit eviction**: sessions leave only through `evict_idle`

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::{ParticipantId, SessionId, Timestamp};
use crate::domain::game::Board;
use crate::domain::session::{Session, SessionError, SessionSnapshot};

/// Exclusive handle to one session.
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Registry port for in-process session ownership.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Register a new session and return it already locked.
    ///
    /// The caller publishes the initial snapshot before releasing the guard,
    /// so no other mutation can overtake the creation.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if `id` is taken
    async fn create(
        &self,
        id: SessionId,
        first: ParticipantId,
        board: Board,
    ) -> Result<SessionGuard, SessionError>;

    /// Acquire exclusive access to a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no session has this id
    async fn lock(&self, id: &SessionId) -> Result<SessionGuard, SessionError>;

    /// Snapshot of a session, taken under its lock.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no session has this id
    async fn get(&self, id: &SessionId) -> Result<SessionSnapshot, SessionError>;

    /// Remove sessions whose last mutation happened before `cutoff`.
    ///
    /// Sessions that are locked at the time of the sweep count as busy and
    /// are kept. Returns the removed ids.
    async fn evict_idle(&self, cutoff: Timestamp) -> Vec<SessionId>;

    /// Number of registered sessions.
    async fn len(&self) -> usize;
}
