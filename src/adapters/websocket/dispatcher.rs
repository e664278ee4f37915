//! Broadcast dispatcher connecting the change feed to observers.
//!
//! # Event Flow
//!
//! ```text
//! Snapshot committed
//!          │
//!          ▼
//! ┌────────────────────┐
//! │    Change Feed     │  bounded, FIFO
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │ BroadcastDispatcher│  single consumer
//! │  encode once       │
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │ try_send to every  │
//! │ observer of session│
//! │ (latest slot when  │
//! │  a queue is full)  │
//! └────────────────────┘
//! ```
//!
//! ## Graceful Shutdown
//!
//! On shutdown the feed is closed and whatever is already queued is still
//! dispatched before the task returns.

use std::sync::Arc;

use tokio::sync::watch;

use crate::adapters::events::ChangeFeedReceiver;
use crate::domain::foundation::DomainError;
use crate::domain::session::SessionSnapshot;

use super::connections::{ConnectionRegistry, Delivered, Delivery, DeliveryError};
use super::messages::ServerMessage;

/// Outcome of dispatching one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Connections the snapshot was queued for.
    pub delivered: usize,
    /// Connections with a full queue; the snapshot waits in their latest slot.
    pub coalesced: usize,
    /// Connections already closed.
    pub failed: usize,
}

/// Single consumer of the change feed.
pub struct BroadcastDispatcher {
    connections: Arc<ConnectionRegistry>,
}

impl BroadcastDispatcher {
    pub fn new(connections: Arc<ConnectionRegistry>) -> Self {
        Self { connections }
    }

    /// Drain `feed` until shutdown is signalled or every producer is gone.
    pub async fn run(&self, mut feed: ChangeFeedReceiver, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Broadcast dispatcher started");

        loop {
            tokio::select! {
                entry = feed.recv() => match entry {
                    Some(snapshot) => self.dispatch_logged(snapshot).await,
                    None => {
                        tracing::info!("Change feed closed, dispatcher stopping");
                        return;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        feed.close();
        let mut drained = 0usize;
        while let Some(snapshot) = feed.recv().await {
            self.dispatch_logged(snapshot).await;
            drained += 1;
        }
        tracing::info!(drained, "Broadcast dispatcher stopped");
    }

    /// Deliver one snapshot to every current observer of its session.
    ///
    /// # Errors
    ///
    /// - `SerializationError` if the snapshot cannot be encoded; nothing is sent
    pub async fn dispatch(&self, snapshot: SessionSnapshot) -> Result<DispatchReport, DomainError> {
        let session_id = snapshot.id.clone();
        let version = snapshot.version;
        let payload = ServerMessage::state(snapshot).encode()?;

        let mut report = DispatchReport::default();
        for sink in self.connections.connections_for(&session_id).await {
            let delivery = Delivery {
                version,
                payload: Arc::clone(&payload),
            };
            match sink.deliver(delivery) {
                Ok(Delivered::Queued) => report.delivered += 1,
                Ok(Delivered::Coalesced) => {
                    report.coalesced += 1;
                    tracing::warn!(
                        session_id = %session_id,
                        connection_id = %sink.id(),
                        version,
                        "Observer too slow, snapshot coalesced"
                    );
                }
                Err(DeliveryError::Closed) => {
                    report.failed += 1;
                    tracing::debug!(
                        session_id = %session_id,
                        connection_id = %sink.id(),
                        version,
                        "Observer already closed"
                    );
                }
            }
        }

        tracing::debug!(
            session_id = %session_id,
            version,
            delivered = report.delivered,
            coalesced = report.coalesced,
            failed = report.failed,
            "Snapshot dispatched"
        );
        Ok(report)
    }

    async fn dispatch_logged(&self, snapshot: SessionSnapshot) {
        let session_id = snapshot.id.clone();
        let version = snapshot.version;
        if let Err(e) = self.dispatch(snapshot).await {
            tracing::error!(session_id = %session_id, version, error = %e, "Dispatch failed");
        }
    }
}
