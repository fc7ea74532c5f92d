//! HTTP adapter for the humanizer.
//!
//! # Endpoints
//!
//! - `GET     /health`       Liveness check
//! - `POST    /api/humanize` Humanize `{"text", "persona"}`
//! - `OPTIONS /api/humanize` Pre-flight

pub mod routes;

pub use routes::{app_router, AppState};

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::persona::PersonaCatalog;

/// Serve until Ctrl+C.
pub async fn serve(config: AppConfig) -> Result<()> {
    let catalog = PersonaCatalog::from_settings(&config.personas)?;
    let state = AppState::new(&catalog, &config)?;
    let app = app_router(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind {}: {}", bind_addr, e)))?;

    info!(
        addr = %bind_addr,
        personas = ?catalog.names().collect::<Vec<_>>(),
        source = %catalog.source(),
        default_persona = %config.personas.default,
        "StudentVibe HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server failed: {}", e)))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}
