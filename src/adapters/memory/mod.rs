//! In-process storage adapters.
//!
//! - `InMemorySessionRegistry` - Per-session locked map of live sessions
//! - `SessionJanitor` - Optional idle-session eviction task

mod janitor;
mod session_registry;

pub use janitor::{SessionJanitor, SessionJanitorConfig};
pub use session_registry::InMemorySessionRegistry;
