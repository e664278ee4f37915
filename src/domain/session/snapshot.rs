//! Wire snapshot of a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ParticipantId, SessionId};
use crate::domain::game::Board;

use super::LifecycleStatus;

/// Immutable, fully-resolved view of a session at one version.
///
/// This is both the Change Feed entry and the payload every observer and
/// HTTP caller receives. Absent participants and an undecided winner are
/// rendered as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Per-session sequence number; grows by one per committed mutation.
    pub version: u64,
    pub id: SessionId,
    pub board: Board,
    pub turn: String,
    pub winner: String,
    pub over: bool,
    pub players: [String; 2],
    pub current_role_assignment: RoleSnapshot,
    pub status: LifecycleStatus,
    pub restart_votes: Vec<ParticipantId>,
}

/// Participant holding each mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSnapshot {
    pub x: String,
    pub o: String,
}

impl SessionSnapshot {
    pub fn session_id(&self) -> &SessionId {
        &self.id
    }
}
