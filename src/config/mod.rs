//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TICTAC_RELAY` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a runnable server.
//!
//! # Example
//!
//! ```no_run
//! use tictac_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod feed;
mod server;
mod sessions;

pub use error::{ConfigError, ValidationError};
pub use feed::FeedConfig;
pub use server::{CorsPolicy, Environment, LogFormat, ServerConfig};
pub use sessions::{SessionsConfig, MAX_IDLE_TTL_SECS};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, HTTP limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Change feed and per-connection buffering
    #[serde(default)]
    pub feed: FeedConfig,

    /// Session eviction and round policy
    #[serde(default)]
    pub sessions: SessionsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TICTAC_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TICTAC_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TICTAC_RELAY__FEED__CAPACITY=256` -> `feed.capacity = 256`
    /// - `TICTAC_RELAY__SESSIONS__MARK_POLICY=alternate` -> `sessions.mark_policy`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TICTAC_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.feed.validate()?;
        self.sessions.validate()?;
        Ok(())
    }
}
