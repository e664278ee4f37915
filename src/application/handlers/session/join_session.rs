//! JoinSessionHandler - Command handler for seating the second participant.

use std::sync::Arc;

use crate::domain::foundation::{ParticipantId, SessionId};
use crate::domain::session::{SessionError, SessionSnapshot};
use crate::ports::{ChangePublisher, SessionRegistry};

use super::publish::publish_committed;

/// Command to join an existing session.
#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
    pub participant: ParticipantId,
}

/// Handler for joining sessions.
pub struct JoinSessionHandler {
    registry: Arc<dyn SessionRegistry>,
    publisher: Arc<dyn ChangePublisher>,
}

impl JoinSessionHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, publisher: Arc<dyn ChangePublisher>) -> Self {
        Self {
            registry,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: JoinSessionCommand) -> Result<SessionSnapshot, SessionError> {
        let mut session = self.registry.lock(&cmd.session_id).await?;

        session.join(cmd.participant.clone())?;

        let snapshot = session.snapshot();
        publish_committed(self.publisher.as_ref(), snapshot.clone()).await;
        drop(session);

        tracing::info!(
            session_id = %cmd.session_id,
            participant = %cmd.participant,
            "Participant joined"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::publish::test_support::*;
    use crate::domain::session::LifecycleStatus;

    fn cmd(session: &str, participant: &str) -> JoinSessionCommand {
        JoinSessionCommand {
            session_id: sid(session),
            participant: pid(participant),
        }
    }

    #[tokio::test]
    async fn join_activates_session_with_creator_to_move() {
        let registry = registry_with("g1", false).await;
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = JoinSessionHandler::new(registry, publisher.clone());

        let snap = handler.handle(cmd("g1", "B")).await.unwrap();

        assert_eq!(snap.status, LifecycleStatus::Active);
        assert_eq!(snap.players, ["A".to_string(), "B".to_string()]);
        assert_eq!(snap.current_role_assignment.o, "B");
        assert_eq!(snap.turn, "A");
        assert_eq!(publisher.versions(), vec![1]);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let registry = registry_with("g1", false).await;
        let handler = JoinSessionHandler::new(registry, Arc::new(RecordingPublisher::new()));

        let result = handler.handle(cmd("missing", "B")).await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn creator_cannot_join_own_session() {
        let registry = registry_with("g1", false).await;
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = JoinSessionHandler::new(registry.clone(), publisher.clone());

        let result = handler.handle(cmd("g1", "A")).await;

        assert!(matches!(result, Err(SessionError::NotJoinable(_))));
        assert!(publisher.published().is_empty());
        assert_eq!(registry.get(&sid("g1")).await.unwrap().version, 0);
    }

    #[tokio::test]
    async fn third_participant_is_rejected() {
        let registry = registry_with("g1", true).await;
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = JoinSessionHandler::new(registry, publisher.clone());

        let result = handler.handle(cmd("g1", "C")).await;

        assert!(matches!(result, Err(SessionError::NotJoinable(_))));
        assert!(publisher.published().is_empty());
    }
}
