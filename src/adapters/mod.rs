//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the session core to the outside world:
//! - `memory` - In-process session registry and idle eviction
//! - `rules` - Game rules engines
//! - `ids` - Session id generation
//! - `events` - Change feed (bounded snapshot queue)
//! - `websocket` - Observer registry, dispatcher and WebSocket endpoint
//! - `http` - REST endpoints

pub mod events;
pub mod http;
pub mod ids;
pub mod memory;
pub mod rules;
pub mod websocket;

pub use events::{ChangeFeedReceiver, ChangeFeedSender};
pub use ids::UuidIdGenerator;
pub use memory::{InMemorySessionRegistry, SessionJanitor, SessionJanitorConfig};
pub use rules::TicTacToe;
pub use websocket::{BroadcastDispatcher, ConnectionRegistry, SessionObserver};
