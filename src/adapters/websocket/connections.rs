//! Observer connection registry for session-based fan-out.
//!
//! Connections are grouped by session ID so the dispatcher can deliver a
//! snapshot to exactly the observers of that session.
//!
//! # Architecture
//!
//! ```text
//! game-123              game-456
//! ├── conn-a            ├── conn-d
//! ├── conn-b            └── conn-e
//! └── conn-c
//! ```
//!
//! Each connection owns a small bounded queue plus a single "latest" slot.
//! Delivery never waits: when the queue is full the snapshot replaces
//! whatever sits in the slot, so a slow observer skips intermediate
//! versions but always ends up with the newest one.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, watch, RwLock};

use crate::domain::foundation::{ConnectionId, DomainError, ErrorCode, SessionId};

/// Default per-connection buffer (snapshots).
pub const DEFAULT_CONNECTION_BUFFER: usize = 32;

/// A serialized snapshot on its way to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Version of the snapshot carried in `payload`.
    pub version: u64,
    /// Encoded frame, shared by every recipient.
    pub payload: Arc<str>,
}

/// How a delivery was accepted by one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivered {
    /// Appended to the connection's queue.
    Queued,
    /// Queue full; parked in the latest slot, replacing anything older.
    Coalesced,
}

/// Why a delivery to one connection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("connection is closed")]
    Closed,
}

/// Write side of one observer connection.
#[derive(Debug, Clone)]
pub struct ConnectionSink {
    id: ConnectionId,
    tx: mpsc::Sender<Delivery>,
    latest: Arc<watch::Sender<Option<Delivery>>>,
}

impl ConnectionSink {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Hand a delivery to the connection without waiting.
    pub fn deliver(&self, delivery: Delivery) -> Result<Delivered, DeliveryError> {
        match self.tx.try_send(delivery) {
            Ok(()) => Ok(Delivered::Queued),
            Err(TrySendError::Full(delivery)) => {
                self.latest.send_if_modified(|slot| {
                    let newer = slot.as_ref().map_or(true, |held| held.version < delivery.version);
                    if newer {
                        *slot = Some(delivery);
                    }
                    newer
                });
                Ok(Delivered::Coalesced)
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }
}

/// Identifies one registration; required to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionHandle {
    pub session_id: SessionId,
    pub connection_id: ConnectionId,
}

/// Read side of one observer connection.
///
/// Tracks the newest version the observer has seen and silently skips
/// anything older, so a delivery that raced the initial snapshot is never
/// shown after it.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<Delivery>,
    latest: watch::Receiver<Option<Delivery>>,
    last_seen: Option<u64>,
}

impl Subscription {
    pub fn new(rx: mpsc::Receiver<Delivery>, latest: watch::Receiver<Option<Delivery>>) -> Self {
        Self {
            rx,
            latest,
            last_seen: None,
        }
    }

    /// Record a version delivered out of band (initial or requested snapshot).
    pub fn mark_seen(&mut self, version: u64) {
        self.last_seen = Some(self.last_seen.map_or(version, |seen| seen.max(version)));
    }

    /// Newest version handed to the observer so far.
    pub fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }

    /// Next delivery newer than everything seen. `None` once unsubscribed.
    ///
    /// The queue is drained first; the latest slot is only consulted when
    /// the queue is empty, since it is filled only while the queue is full.
    pub async fn recv(&mut self) -> Option<Delivery> {
        loop {
            let delivery = match self.rx.try_recv() {
                Ok(delivery) => delivery,
                Err(TryRecvError::Empty) => match self.unseen_latest() {
                    Some(delivery) => delivery,
                    None => match self.rx.recv().await {
                        Some(delivery) => delivery,
                        None => self.unseen_latest()?,
                    },
                },
                Err(TryRecvError::Disconnected) => self.unseen_latest()?,
            };
            if !self.is_unseen(delivery.version) {
                tracing::trace!(version = delivery.version, "Skipping stale delivery");
                continue;
            }
            self.last_seen = Some(delivery.version);
            return Some(delivery);
        }
    }

    fn is_unseen(&self, version: u64) -> bool {
        self.last_seen.map_or(true, |seen| version > seen)
    }

    fn unseen_latest(&self) -> Option<Delivery> {
        self.latest
            .borrow()
            .as_ref()
            .filter(|delivery| self.is_unseen(delivery.version))
            .cloned()
    }
}

/// Registry of live observer connections, keyed by session.
///
/// # Thread Safety
///
/// A single `RwLock` guards the whole map. Enumeration (one per dispatched
/// snapshot) takes the read side; subscribe and unsubscribe take the write
/// side. Enumeration returns a copy so delivery never happens under the lock.
pub struct ConnectionRegistry {
    sessions: RwLock<HashMap<SessionId, HashMap<ConnectionId, ConnectionSink>>>,
    buffer: usize,
}

impl ConnectionRegistry {
    /// Create a registry whose connections buffer up to `buffer` snapshots.
    pub fn new(buffer: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Create with the default buffer.
    pub fn with_default_buffer() -> Self {
        Self::new(DEFAULT_CONNECTION_BUFFER)
    }

    /// Register a new observer of `session_id`.
    pub async fn subscribe(&self, session_id: SessionId) -> (ConnectionHandle, Subscription) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let (latest_tx, latest_rx) = watch::channel(None);
        let connection_id = ConnectionId::new();
        let sink = ConnectionSink {
            id: connection_id,
            tx,
            latest: Arc::new(latest_tx),
        };

        self.sessions
            .write()
            .await
            .entry(session_id.clone())
            .or_default()
            .insert(connection_id, sink);

        tracing::debug!(
            session_id = %session_id,
            connection_id = %connection_id,
            "Connection registered"
        );

        (
            ConnectionHandle {
                session_id,
                connection_id,
            },
            Subscription::new(rx, latest_rx),
        )
    }

    /// Remove a registration. Empty per-session sets are dropped.
    ///
    /// # Errors
    ///
    /// - `ConnectionNotFound` if the handle is not (or no longer) registered
    pub async fn unsubscribe(&self, handle: &ConnectionHandle) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let removed = match sessions.get_mut(&handle.session_id) {
            Some(connections) => {
                let removed = connections.remove(&handle.connection_id).is_some();
                if connections.is_empty() {
                    sessions.remove(&handle.session_id);
                }
                removed
            }
            None => false,
        };

        if !removed {
            return Err(DomainError::new(
                ErrorCode::ConnectionNotFound,
                format!("Connection {} is not registered", handle.connection_id),
            )
            .with_detail("session_id", handle.session_id.to_string()));
        }

        tracing::debug!(
            session_id = %handle.session_id,
            connection_id = %handle.connection_id,
            "Connection deregistered"
        );
        Ok(())
    }

    /// Copy of the sinks currently registered for `session_id`.
    pub async fn connections_for(&self, session_id: &SessionId) -> Vec<ConnectionSink> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|connections| connections.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of observers of one session.
    pub async fn connection_count(&self, session_id: &SessionId) -> usize {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Number of observers across all sessions.
    pub async fn total_connections(&self) -> usize {
        self.sessions.read().await.values().map(HashMap::len).sum()
    }

    /// Sessions with at least one observer (for monitoring/debugging).
    pub async fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::with_default_buffer()
    }
}
