use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};

use userhub::logging::init_tracing;
use userhub::metrics::{init_metrics, metrics_app};
use userhub::router::init_router;
use userhub::state::init_app_state;
use userhub_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting Userhub API");

    if let Some(handle) = init_metrics(&config.logging)? {
        let address = config.server.metrics_address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {address}"))?;
        info!("Metrics available at http://{address}/metrics");

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %err, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state(&config).await?;
    let app = init_router(state);

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("Server running on http://{address}");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
