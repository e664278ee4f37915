//! CreateSessionHandler - Command handler for opening new game sessions.

use std::sync::Arc;

use crate::domain::foundation::ParticipantId;
use crate::domain::session::{SessionError, SessionSnapshot};
use crate::ports::{ChangePublisher, IdGenerator, RulesEngine, SessionRegistry};

use super::publish::publish_committed;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub creator: ParticipantId,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    registry: Arc<dyn SessionRegistry>,
    rules: Arc<dyn RulesEngine>,
    ids: Arc<dyn IdGenerator>,
    publisher: Arc<dyn ChangePublisher>,
}

impl CreateSessionHandler {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        rules: Arc<dyn RulesEngine>,
        ids: Arc<dyn IdGenerator>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            registry,
            rules,
            ids,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<SessionSnapshot, SessionError> {
        // 1. Register; the returned guard keeps the session exclusive
        let session_id = self.ids.new_id();
        let session = self
            .registry
            .create(session_id, cmd.creator, self.rules.initial_board())
            .await?;

        // 2. Publish the initial state before anyone else can mutate it
        let snapshot = session.snapshot();
        publish_committed(self.publisher.as_ref(), snapshot.clone()).await;
        drop(session);

        tracing::info!(
            session_id = %snapshot.id,
            participant = %snapshot.players[0],
            "Session created"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionRegistry;
    use crate::application::handlers::session::publish::test_support::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::session::LifecycleStatus;

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn new_id(&self) -> SessionId {
            sid("same")
        }
    }

    fn handler_with(
        registry: Arc<InMemorySessionRegistry>,
        ids: Arc<dyn IdGenerator>,
        publisher: Arc<RecordingPublisher>,
    ) -> CreateSessionHandler {
        CreateSessionHandler::new(registry, rules(), ids, publisher)
    }

    #[tokio::test]
    async fn creates_waiting_session_with_creator_as_x() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler_with(
            registry.clone(),
            Arc::new(SequentialIds::default()),
            publisher.clone(),
        );

        let snap = handler
            .handle(CreateSessionCommand { creator: pid("A") })
            .await
            .unwrap();

        assert_eq!(snap.id, sid("game-1"));
        assert_eq!(snap.status, LifecycleStatus::Waiting);
        assert_eq!(snap.players, ["A".to_string(), String::new()]);
        assert_eq!(snap.current_role_assignment.x, "A");
        assert_eq!(snap.turn, "A");
        assert_eq!(snap.version, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn publishes_initial_snapshot() {
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler_with(
            Arc::new(InMemorySessionRegistry::new()),
            Arc::new(SequentialIds::default()),
            publisher.clone(),
        );

        let snap = handler
            .handle(CreateSessionCommand { creator: pid("A") })
            .await
            .unwrap();

        assert_eq!(publisher.published(), vec![snap]);
    }

    #[tokio::test]
    async fn duplicate_id_fails_without_publishing() {
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = handler_with(
            Arc::new(InMemorySessionRegistry::new()),
            Arc::new(FixedIds),
            publisher.clone(),
        );
        handler
            .handle(CreateSessionCommand { creator: pid("A") })
            .await
            .unwrap();

        let result = handler.handle(CreateSessionCommand { creator: pid("B") }).await;

        assert!(matches!(result, Err(SessionError::AlreadyExists(_))));
        assert_eq!(publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn closed_feed_does_not_fail_creation() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let handler = handler_with(
            registry.clone(),
            Arc::new(SequentialIds::default()),
            Arc::new(RecordingPublisher::failing()),
        );

        let result = handler.handle(CreateSessionCommand { creator: pid("A") }).await;

        assert!(result.is_ok());
        assert_eq!(registry.len().await, 1);
    }
}
