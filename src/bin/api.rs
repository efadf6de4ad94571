use anyhow::{Context, Result};
use pagesense::{api, app_state::AppState, config::Config, pipeline::ContentService, telemetry};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let config = Config::from_env()?;
    info!(?config, "configuration loaded");
    let bind_addr = config.bind_addr().to_string();

    let service = ContentService::new(config).context("failed to build inference client")?;
    let shutdown = service.shutdown_token();
    let app = api::router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", bind_addr))?;
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, cancelling in-flight analyses");
    shutdown.cancel();
}
