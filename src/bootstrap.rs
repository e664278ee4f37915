//! Service assembly - wires adapters into handlers and the HTTP router.
//!
//! ```text
//! HTTP ─► GameHandlers ─► SessionRegistry ─► ChangeFeed ─► BroadcastDispatcher
//!                                                                 │
//! WS ◄──────────────── SessionObserver ◄── ConnectionRegistry ◄───┘
//! ```

use std::sync::Arc;

use axum::Router;
use http::{HeaderValue, Method};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::adapters::events::{self, ChangeFeedReceiver};
use crate::adapters::http::{game_routes, health_routes, GameHandlers, HealthState};
use crate::adapters::memory::{InMemorySessionRegistry, SessionJanitor, SessionJanitorConfig};
use crate::adapters::rules::TicTacToe;
use crate::adapters::websocket::{
    websocket_router, BroadcastDispatcher, ConnectionRegistry, SessionObserver, WebSocketState,
};
use crate::adapters::UuidIdGenerator;
use crate::application::handlers::session::{
    CreateSessionHandler, GetSessionHandler, JoinSessionHandler, MakeMoveHandler,
    VoteRestartHandler,
};
use crate::config::{AppConfig, CorsPolicy, LogFormat, ServerConfig};
use crate::ports::{ChangePublisher, IdGenerator, RulesEngine, SessionRegistry};

/// Fully assembled service.
pub struct App {
    config: AppConfig,
    sessions: Arc<dyn SessionRegistry>,
    connections: Arc<ConnectionRegistry>,
    observer: Arc<SessionObserver>,
    handlers: GameHandlers,
    feed: Option<ChangeFeedReceiver>,
}

impl App {
    /// Assemble every component from configuration.
    pub fn build(config: AppConfig) -> Self {
        let sessions: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
        let connections = Arc::new(ConnectionRegistry::new(config.feed.connection_buffer));
        let rules: Arc<dyn RulesEngine> = Arc::new(TicTacToe);
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);

        let (feed_tx, feed_rx) = events::channel(config.feed.capacity);
        let publisher: Arc<dyn ChangePublisher> = Arc::new(feed_tx);

        let handlers = GameHandlers::new(
            Arc::new(CreateSessionHandler::new(
                sessions.clone(),
                rules.clone(),
                ids,
                publisher.clone(),
            )),
            Arc::new(JoinSessionHandler::new(sessions.clone(), publisher.clone())),
            Arc::new(MakeMoveHandler::new(
                sessions.clone(),
                rules.clone(),
                publisher.clone(),
            )),
            Arc::new(VoteRestartHandler::new(
                sessions.clone(),
                rules,
                publisher,
                config.sessions.mark_policy,
            )),
            Arc::new(GetSessionHandler::new(sessions.clone())),
        );

        let observer = Arc::new(SessionObserver::new(sessions.clone(), connections.clone()));

        Self {
            config,
            sessions,
            connections,
            observer,
            handlers,
            feed: Some(feed_rx),
        }
    }

    /// Spawn the dispatcher and, when eviction is enabled, the janitor.
    ///
    /// The dispatcher owns the change feed, so only the first call spawns it.
    pub fn spawn_background(&mut self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::new();

        match self.feed.take() {
            Some(feed) => {
                let dispatcher = BroadcastDispatcher::new(self.connections.clone());
                let shutdown = shutdown.clone();
                tasks.push(tokio::spawn(async move { dispatcher.run(feed, shutdown).await }));
            }
            None => tracing::warn!("Dispatcher already running, not spawning another"),
        }

        if self.config.sessions.eviction_enabled() {
            let janitor = SessionJanitor::new(
                self.sessions.clone(),
                SessionJanitorConfig {
                    idle_ttl: self.config.sessions.idle_ttl(),
                    sweep_interval: self.config.sessions.sweep_interval(),
                },
            );
            tracing::info!(
                idle_ttl_secs = self.config.sessions.idle_ttl_secs,
                "Idle session eviction enabled"
            );
            tasks.push(tokio::spawn(async move { janitor.run(shutdown).await }));
        }

        tasks
    }

    /// HTTP + WebSocket router with tracing, CORS and timeout layers.
    pub fn router(&self) -> Router {
        let health = HealthState {
            sessions: self.sessions.clone(),
            connections: self.connections.clone(),
        };

        Router::new()
            .merge(game_routes(self.handlers.clone()))
            .merge(websocket_router(WebSocketState::new(self.observer.clone())))
            .merge(health_routes(health))
            .layer(TimeoutLayer::new(self.config.server.request_timeout()))
            .layer(cors_layer(&self.config.server))
            .layer(TraceLayer::new_for_http())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<dyn SessionRegistry> {
        &self.sessions
    }

    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }

    pub fn observer(&self) -> &Arc<SessionObserver> {
        &self.observer
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    match config.cors_policy() {
        CorsPolicy::Permissive => CorsLayer::permissive(),
        // no allowed origins: browsers see no CORS headers at all
        CorsPolicy::SameOrigin => CorsLayer::new(),
        CorsPolicy::AllowList(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter when set.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.effective_log_format() {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
