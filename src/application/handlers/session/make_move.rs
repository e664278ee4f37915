//! MakeMoveHandler - Command handler for placing a mark.

use std::sync::Arc;

use crate::domain::foundation::{ParticipantId, SessionId};
use crate::domain::game::{Position, Terminal};
use crate::domain::session::{SessionError, SessionSnapshot};
use crate::ports::{ChangePublisher, RulesEngine, SessionRegistry};

use super::publish::publish_committed;

/// Command to play a move.
#[derive(Debug, Clone)]
pub struct MakeMoveCommand {
    pub session_id: SessionId,
    pub actor: ParticipantId,
    pub position: Position,
}

/// Result of an accepted move.
#[derive(Debug, Clone)]
pub struct MakeMoveResult {
    pub snapshot: SessionSnapshot,
    pub terminal: Terminal,
}

/// Handler for moves.
pub struct MakeMoveHandler {
    registry: Arc<dyn SessionRegistry>,
    rules: Arc<dyn RulesEngine>,
    publisher: Arc<dyn ChangePublisher>,
}

impl MakeMoveHandler {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        rules: Arc<dyn RulesEngine>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            registry,
            rules,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: MakeMoveCommand) -> Result<MakeMoveResult, SessionError> {
        let mut session = self.registry.lock(&cmd.session_id).await?;

        let terminal = session.apply_move(&cmd.actor, cmd.position, self.rules.as_ref())?;

        let snapshot = session.snapshot();
        publish_committed(self.publisher.as_ref(), snapshot.clone()).await;
        drop(session);

        if terminal != Terminal::Continue {
            tracing::info!(
                session_id = %cmd.session_id,
                participant = %cmd.actor,
                outcome = ?terminal,
                "Round finished"
            );
        }
        Ok(MakeMoveResult { snapshot, terminal })
    }
}
