//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidBindAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Change feed capacity must be greater than zero")]
    InvalidFeedCapacity,

    #[error("Connection buffer must be greater than zero")]
    InvalidConnectionBuffer,

    #[error("Sweep interval must be greater than zero when eviction is enabled")]
    InvalidSweepInterval,

    #[error("Idle TTL must not exceed {max} seconds")]
    InvalidIdleTtl { max: u64 },
}
