//! WebSocket upgrade handler for live game observation.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Parse the game id
//! 2. Upgrade to WebSocket
//! 3. Subscribe and send the current state
//! 4. Forward state changes and answer client messages until disconnect
//! 5. Unsubscribe

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};

use crate::domain::foundation::{ErrorCode, SessionId};

use super::messages::{ClientMessage, ServerMessage};
use super::observer::{Observation, SessionObserver};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub observer: Arc<SessionObserver>,
}

impl WebSocketState {
    pub fn new(observer: Arc<SessionObserver>) -> Self {
        Self { observer }
    }
}

/// Handle WebSocket upgrade requests for a game.
///
/// Route: `GET /ws/game/state/:game_id`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(game_id): Path<String>,
    State(state): State<WebSocketState>,
) -> Response {
    let session_id: SessionId = match game_id.parse() {
        Ok(id) => id,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid game ID").into_response(),
    };

    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Handle an established WebSocket connection.
///
/// A single loop owns both halves of the socket, so a `request.state`
/// answer and a live delivery can never be written out of version order.
async fn handle_socket(socket: WebSocket, session_id: SessionId, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let Observation {
        handle,
        mut subscription,
        snapshot,
    } = match state.observer.observe(session_id.clone()).await {
        Ok(observation) => observation,
        Err(e) => {
            tracing::debug!(session_id = %session_id, error = %e, "Observe rejected");
            let _ = send_message(&mut sender, &ServerMessage::error(e.code(), e.to_string())).await;
            let _ = sender
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: Cow::from("game not found"),
                })))
                .await;
            return;
        }
    };

    let connection_id = handle.connection_id;
    tracing::info!(session_id = %session_id, connection_id = %connection_id, "Observer connected");

    if send_message(&mut sender, &ServerMessage::state(snapshot)).await.is_ok() {
        loop {
            tokio::select! {
                delivery = subscription.recv() => {
                    let Some(delivery) = delivery else { break };
                    if let Err(e) = sender.send(Message::Text(delivery.payload.to_string())).await {
                        tracing::debug!(
                            connection_id = %connection_id,
                            "Send error, closing connection: {}",
                            e
                        );
                        break;
                    }
                }
                incoming = receiver.next() => {
                    let reply = match incoming {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ClientMessage>(&text) {
                                Ok(ClientMessage::Ping) => Some(ServerMessage::pong()),
                                Ok(ClientMessage::RequestState) => {
                                    match state.observer.current(&session_id).await {
                                        Ok(current) => {
                                            subscription.mark_seen(current.version);
                                            Some(ServerMessage::state(current))
                                        }
                                        Err(e) => Some(ServerMessage::error(e.code(), e.to_string())),
                                    }
                                }
                                Err(_) => Some(ServerMessage::error(
                                    ErrorCode::ValidationFailed,
                                    "Unsupported message",
                                )),
                            }
                        }
                        Some(Ok(Message::Binary(_))) => {
                            tracing::warn!(connection_id = %connection_id, "Received unsupported binary message");
                            None
                        }
                        // protocol-level ping/pong is answered by axum
                        Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => None,
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::debug!(connection_id = %connection_id, "Client closed connection");
                            break;
                        }
                        Some(Err(e)) => {
                            tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                            break;
                        }
                    };

                    if let Some(reply) = reply {
                        if send_message(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    state.observer.release(&handle).await;
    tracing::info!(session_id = %session_id, connection_id = %connection_id, "Observer disconnected");
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let payload = msg.encode().map_err(axum::Error::new)?;
    sender.send(Message::Text(payload.to_string())).await
}

/// Create axum router for the observation endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new().merge(websocket_router(state));
/// ```
pub fn websocket_router(state: WebSocketState) -> Router {
    Router::new()
        .route("/ws/game/state/:game_id", get(ws_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionRegistry;
    use crate::adapters::websocket::ConnectionRegistry;

    fn state() -> WebSocketState {
        let observer = SessionObserver::new(
            Arc::new(InMemorySessionRegistry::new()),
            Arc::new(ConnectionRegistry::default()),
        );
        WebSocketState::new(Arc::new(observer))
    }

    #[test]
    fn websocket_state_shares_observer() {
        let state = state();
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.observer, &cloned.observer));
    }

    #[test]
    fn websocket_router_creates_route() {
        let _router = websocket_router(state());
    }
}
