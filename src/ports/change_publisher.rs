//! ChangePublisher port - hand-off between "state changed" and delivery.
//!
//! The mutation side publishes a full snapshot after every committed change
//! without knowing who, if anyone, is watching.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::session::SessionSnapshot;

/// Port for publishing committed session snapshots.
///
/// Implementations must ensure:
/// - Snapshots of one session come out in the order they were published
/// - A full queue delays the caller instead of dropping the snapshot
///
/// # Example
///
/// ```ignore
/// let snapshot = session.snapshot();
/// publisher.publish(snapshot).await?;
/// ```
#[async_trait]
pub trait ChangePublisher: Send + Sync {
    /// Enqueue one snapshot for delivery.
    ///
    /// # Errors
    ///
    /// - `FeedClosed` if nothing consumes the feed any more
    async fn publish(&self, snapshot: SessionSnapshot) -> Result<(), DomainError>;
}
