use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geofence_service::{
    config::Config,
    handlers::{router, AppState},
    services::shelter::ShelterService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geofence_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting geofence service");

    let shelters = match &config.shelters_file {
        Some(path) => ShelterService::load_from_file(path)
            .with_context(|| format!("Failed to load shelters from {}", path))?,
        None => {
            warn!("SHELTERS_FILE not set, starting with an empty shelter registry");
            ShelterService::new()
        }
    };
    info!("{} shelters registered", shelters.len().await);

    let app = router(AppState::new(config.clone(), Arc::new(shelters)));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
