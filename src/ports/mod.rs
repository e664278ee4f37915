//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the session core and the outside world. Adapters implement these ports.
//!
//! - `SessionRegistry` - Exclusive, per-session locked ownership of sessions
//! - `ChangePublisher` - Hand-off of committed snapshots to delivery
//! - `RulesEngine` - Pluggable game rules
//! - `IdGenerator` - Source of session identifiers

mod change_publisher;
mod id_generator;
mod rules_engine;
mod session_registry;

pub use change_publisher::ChangePublisher;
pub use id_generator::IdGenerator;
pub use rules_engine::RulesEngine;
pub use session_registry::{SessionGuard, SessionRegistry};
