//! WebSocket adapters for live game observation.
//!
//! This module pushes committed session snapshots to connected observers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Change Feed                                  │
//! │   bounded mpsc, one entry per committed mutation                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ drains
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    BroadcastDispatcher                               │
//! │   - Encodes each snapshot once                                      │
//! │   - Looks up the session's observers                                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ try_send
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    ConnectionRegistry                                │
//! │   game-123             game-456             game-789                │
//! │   ├── conn-a           ├── conn-d           ├── conn-g              │
//! │   ├── conn-b           └── conn-e           └── conn-h              │
//! │   └── conn-c                                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`connections`] - Per-session observer registry
//! - [`observer`] - Subscribe-then-snapshot observation
//! - [`dispatcher`] - Single consumer of the change feed
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connections;
pub mod dispatcher;
pub mod handler;
pub mod messages;
pub mod observer;

pub use connections::{
    ConnectionHandle, ConnectionRegistry, ConnectionSink, Delivered, Delivery, DeliveryError,
    Subscription, DEFAULT_CONNECTION_BUFFER,
};
pub use dispatcher::{BroadcastDispatcher, DispatchReport};
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ServerMessage};
pub use observer::{Observation, SessionObserver};
