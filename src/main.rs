//! tictac-relay server binary.
//!
//! Configuration comes from `TICTAC_RELAY__*` environment variables (and a
//! `.env` file if present). Stops on Ctrl-C after draining the change feed.

use tokio::net::TcpListener;
use tokio::sync::watch;

use tictac_relay::bootstrap::{init_tracing, App};
use tictac_relay::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        environment = ?config.server.environment,
        feed_capacity = config.feed.capacity,
        mark_policy = ?config.sessions.mark_policy,
        "tictac-relay starting"
    );

    let mut app = App::build(config);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let tasks = app.spawn_background(shutdown_rx);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    if shutdown_tx.send(true).is_err() {
        tracing::debug!("Background tasks already stopped");
    }
    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Background task failed");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
