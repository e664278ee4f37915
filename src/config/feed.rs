//! Change feed and delivery configuration

use serde::Deserialize;

use crate::adapters::events::DEFAULT_FEED_CAPACITY;
use crate::adapters::websocket::DEFAULT_CONNECTION_BUFFER;

use super::error::ValidationError;

/// Change feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Snapshots the change feed buffers before producers wait
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Snapshots each observer connection buffers before deliveries drop
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,
}

impl FeedConfig {
    /// Validate feed configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity == 0 {
            return Err(ValidationError::InvalidFeedCapacity);
        }
        if self.connection_buffer == 0 {
            return Err(ValidationError::InvalidConnectionBuffer);
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            connection_buffer: default_connection_buffer(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_FEED_CAPACITY
}

fn default_connection_buffer() -> usize {
    DEFAULT_CONNECTION_BUFFER
}
