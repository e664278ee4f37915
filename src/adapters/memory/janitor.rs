//! SessionJanitor - Background sweep of abandoned sessions.
//!
//! Sessions are never evicted implicitly. When an idle TTL is configured
//! this task periodically removes sessions whose last committed mutation is
//! older than the TTL.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `idle_ttl` | 1h | Age of last mutation after which a session is dropped |
//! | `sweep_interval` | 60s | How often to sweep |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::SessionRegistry;

/// Configuration for the SessionJanitor task.
#[derive(Debug, Clone)]
pub struct SessionJanitorConfig {
    /// Idle time after which a session is evicted.
    pub idle_ttl: Duration,

    /// How often to sweep.
    pub sweep_interval: Duration,
}

impl Default for SessionJanitorConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Background task that evicts idle sessions.
pub struct SessionJanitor {
    registry: Arc<dyn SessionRegistry>,
    config: SessionJanitorConfig,
}

impl SessionJanitor {
    pub fn new(registry: Arc<dyn SessionRegistry>, config: SessionJanitorConfig) -> Self {
        Self { registry, config }
    }

    /// Sweep until the shutdown signal flips to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Session janitor stopping");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Run exactly one sweep, returning the evicted ids.
    pub async fn sweep_once(&self) -> Vec<SessionId> {
        let ttl_secs = i64::try_from(self.config.idle_ttl.as_secs()).unwrap_or(i64::MAX);
        let cutoff = Timestamp::now().minus_seconds(ttl_secs);
        let evicted = self.registry.evict_idle(cutoff).await;
        if !evicted.is_empty() {
            let remaining = self.registry.len().await;
            tracing::info!(evicted = evicted.len(), remaining, "Evicted idle sessions");
        }
        evicted
    }
}
