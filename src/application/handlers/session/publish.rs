//! Hand-off of committed snapshots to the change feed.

use crate::domain::session::SessionSnapshot;
use crate::ports::ChangePublisher;

/// Publish a committed snapshot.
///
/// Must be called while the session guard is still held so that feed order
/// matches commit order. A publish failure never undoes the mutation; it is
/// logged and the caller still gets its result.
pub(crate) async fn publish_committed(publisher: &dyn ChangePublisher, snapshot: SessionSnapshot) {
    let session_id = snapshot.id.clone();
    let version = snapshot.version;

    match publisher.publish(snapshot).await {
        Ok(()) => tracing::debug!(session_id = %session_id, version, "Snapshot published"),
        Err(e) => tracing::error!(
            session_id = %session_id,
            version,
            error = %e,
            "Failed to publish snapshot"
        ),
    }
}
