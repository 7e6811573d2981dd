//! Trip Planner server entry point.

use trip_planner::bootstrap::{build_app, init_tracing, BootstrapError};
use trip_planner::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), BootstrapError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    let app = build_app(&config).await?;
    let addr = config.server.socket_addr()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "trip planner listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
