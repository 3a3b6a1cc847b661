use anyhow::Context;
use clap::Parser;
use marketplace::config::Config;
use marketplace::lifecycle::{setup_tracing, snapshot, MarketplaceSystem};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("loading .env");
        }
    }
    let config = Config::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    let system = MarketplaceSystem::new(config.channel_capacity);
    if let Some(path) = &config.data_file {
        snapshot::load(&system, path).await?;
    }

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, app = %config.app_name, "Marketplace listening");

    axum::serve(listener, system.router(config.api_settings()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(path) = &config.data_file {
        snapshot::save(&system, path).await?;
    }
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
