//! Change Feed - bounded, ordered queue of committed snapshots.
//!
//! Producers are the session handlers (through the [`ChangePublisher`]
//! port); the single consumer is the broadcast dispatcher.
//!
//! # Backpressure
//!
//! The queue never drops. When it is full `publish` waits for room, and
//! since callers publish while still holding their session's lock, the wait
//! pushes back on further mutations of that session.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::session::SessionSnapshot;
use crate::ports::ChangePublisher;

/// Default number of snapshots the feed buffers.
pub const DEFAULT_FEED_CAPACITY: usize = 100;

/// Create a feed that buffers up to `capacity` snapshots.
pub fn channel(capacity: usize) -> (ChangeFeedSender, ChangeFeedReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChangeFeedSender { tx }, ChangeFeedReceiver { rx })
}

/// Producer side; cheap to clone.
#[derive(Debug, Clone)]
pub struct ChangeFeedSender {
    tx: mpsc::Sender<SessionSnapshot>,
}

impl ChangeFeedSender {
    /// True once the consumer is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl ChangePublisher for ChangeFeedSender {
    async fn publish(&self, snapshot: SessionSnapshot) -> Result<(), DomainError> {
        let session_id = snapshot.id.clone();
        let version = snapshot.version;

        self.tx.send(snapshot).await.map_err(|_| {
            DomainError::new(ErrorCode::FeedClosed, "Change feed is closed")
                .with_detail("session_id", session_id.to_string())
                .with_detail("version", version.to_string())
        })?;

        tracing::trace!(session_id = %session_id, version, "Snapshot enqueued");
        Ok(())
    }
}

/// Consumer side; exactly one exists per feed.
#[derive(Debug)]
pub struct ChangeFeedReceiver {
    rx: mpsc::Receiver<SessionSnapshot>,
}

impl ChangeFeedReceiver {
    /// Next snapshot in enqueue order. `None` once closed and drained.
    pub async fn recv(&mut self) -> Option<SessionSnapshot> {
        self.rx.recv().await
    }

    /// Stop accepting new snapshots; already queued ones stay readable.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// Number of snapshots waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ParticipantId, SessionId};
    use crate::domain::game::Board;
    use crate::domain::session::Session;
    use std::time::Duration;

    fn snapshot(id: &str) -> SessionSnapshot {
        Session::new(
            SessionId::new(id).unwrap(),
            ParticipantId::new("A").unwrap(),
            Board::empty(3, 3),
        )
        .snapshot()
    }

    #[tokio::test]
    async fn preserves_enqueue_order() {
        let (tx, mut rx) = channel(10);
        for id in ["g1", "g2", "g3"] {
            tx.publish(snapshot(id)).await.unwrap();
        }

        assert_eq!(rx.len(), 3);
        for id in ["g1", "g2", "g3"] {
            assert_eq!(rx.recv().await.unwrap().id.as_str(), id);
        }
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn full_feed_waits_instead_of_dropping() {
        let (tx, mut rx) = channel(1);
        tx.publish(snapshot("g1")).await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(20), tx.publish(snapshot("g2"))).await;
        assert!(blocked.is_err());

        let waiting = {
            let tx = tx.clone();
            tokio::spawn(async move { tx.publish(snapshot("g3")).await })
        };
        assert_eq!(rx.recv().await.unwrap().id.as_str(), "g1");
        waiting.await.unwrap().unwrap();
        assert_eq!(rx.recv().await.unwrap().id.as_str(), "g3");
    }

    #[tokio::test]
    async fn publish_after_close_is_feed_closed() {
        let (tx, mut rx) = channel(4);
        rx.close();

        let err = tx.publish(snapshot("g1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedClosed);
        assert_eq!(err.details.get("session_id"), Some(&"g1".to_string()));
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn close_keeps_queued_snapshots_readable() {
        let (tx, mut rx) = channel(4);
        tx.publish(snapshot("g1")).await.unwrap();
        rx.close();

        assert_eq!(rx.recv().await.unwrap().id.as_str(), "g1");
        assert!(rx.recv().await.is_none());
    }
}
