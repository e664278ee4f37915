//! VoteRestartHandler - Command handler for starting a fresh round.

use std::sync::Arc;

use crate::domain::foundation::{ParticipantId, SessionId};
use crate::domain::session::{MarkPolicy, RestartProgress, SessionError, SessionSnapshot};
use crate::ports::{ChangePublisher, RulesEngine, SessionRegistry};

use super::publish::publish_committed;

/// Command to cast a restart vote.
#[derive(Debug, Clone)]
pub struct VoteRestartCommand {
    pub session_id: SessionId,
    pub voter: ParticipantId,
}

/// Result of a recorded vote.
#[derive(Debug, Clone)]
pub struct VoteRestartResult {
    pub snapshot: SessionSnapshot,
    pub progress: RestartProgress,
}

/// Handler for restart votes.
pub struct VoteRestartHandler {
    registry: Arc<dyn SessionRegistry>,
    rules: Arc<dyn RulesEngine>,
    publisher: Arc<dyn ChangePublisher>,
    policy: MarkPolicy,
}

impl VoteRestartHandler {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        rules: Arc<dyn RulesEngine>,
        publisher: Arc<dyn ChangePublisher>,
        policy: MarkPolicy,
    ) -> Self {
        Self {
            registry,
            rules,
            publisher,
            policy,
        }
    }

    pub async fn handle(&self, cmd: VoteRestartCommand) -> Result<VoteRestartResult, SessionError> {
        let mut session = self.registry.lock(&cmd.session_id).await?;

        let progress =
            session.vote_restart(cmd.voter.clone(), self.rules.initial_board(), self.policy)?;

        // Every vote is observable, including a repeated one
        let snapshot = session.snapshot();
        publish_committed(self.publisher.as_ref(), snapshot.clone()).await;
        drop(session);

        match progress {
            RestartProgress::Pending { votes } => tracing::info!(
                session_id = %cmd.session_id,
                participant = %cmd.voter,
                votes,
                "Restart vote recorded"
            ),
            RestartProgress::Reset => tracing::info!(
                session_id = %cmd.session_id,
                participant = %cmd.voter,
                x = %snapshot.current_role_assignment.x,
                "Round restarted"
            ),
        }
        Ok(VoteRestartResult { snapshot, progress })
    }
}
