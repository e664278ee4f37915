//! Listener, logging and HTTP policy configuration

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `request_timeout_secs`
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Deployment environment.
///
/// Production switches the logging default to JSON and refuses
/// cross-origin requests unless origins are listed explicitly.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for local development
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, any header.
    Permissive,
    /// Only the listed origins.
    AllowList(Vec<String>),
    /// No cross-origin access.
    SameOrigin,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive; `RUST_LOG` overrides it
    pub log_level: String,

    /// Unset means pretty outside production, JSON in production
    pub log_format: Option<LogFormat>,

    pub request_timeout_secs: u64,

    /// Comma-separated allowed origins
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,tictac_relay=debug,tower_http=info".to_string(),
            log_format: None,
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured log format, or the environment's default.
    pub fn effective_log_format(&self) -> LogFormat {
        match (self.log_format, self.environment) {
            (Some(format), _) => format,
            (None, Environment::Production) => LogFormat::Json,
            (None, _) => LogFormat::Pretty,
        }
    }

    /// CORS policy derived from `cors_origins` and the environment.
    pub fn cors_policy(&self) -> CorsPolicy {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if !origins.is_empty() {
            CorsPolicy::AllowList(origins)
        } else if self.environment == Environment::Production {
            CorsPolicy::SameOrigin
        } else {
            CorsPolicy::Permissive
        }
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}
