//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::session::MarkPolicy;

use super::error::ValidationError;

/// Longest accepted idle TTL (30 days)
pub const MAX_IDLE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Session lifecycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    /// Idle time after which a session is evicted; 0 disables eviction
    #[serde(default)]
    pub idle_ttl_secs: u64,

    /// How often the janitor sweeps, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// How marks are re-assigned between rounds
    #[serde(default)]
    pub mark_policy: MarkPolicy,
}

impl SessionsConfig {
    /// Whether idle sessions are evicted at all
    pub fn eviction_enabled(&self) -> bool {
        self.idle_ttl_secs > 0
    }

    /// Get idle TTL as Duration
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_ttl_secs > MAX_IDLE_TTL_SECS {
            return Err(ValidationError::InvalidIdleTtl {
                max: MAX_IDLE_TTL_SECS,
            });
        }
        if self.eviction_enabled() && self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 0,
            sweep_interval_secs: default_sweep_interval(),
            mark_policy: MarkPolicy::default(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}
