//! FNOL Triage - API Server Binary
//!
//! Starts the HTTP API that triages FNOL text and documents.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (reads ./fnol.toml when present)
//! cargo run --bin fnol-api
//!
//! # Run against Ollama
//! FNOL_INFERENCE__BACKEND=ollama FNOL_INFERENCE__MODEL=phi3:mini cargo run --bin fnol-api
//! ```
//!
//! # Environment Variables
//!
//! * `FNOL_SERVER__HOST` - Server host (default: 0.0.0.0)
//! * `FNOL_SERVER__PORT` - Server port (default: 8080)
//! * `FNOL_INFERENCE__BACKEND` - llama_cpp, ollama or disabled (default: llama_cpp)
//! * `FNOL_INFERENCE__BASE_URL` - Inference server URL
//! * `FNOL_TRIAGE__FAST_TRACK_THRESHOLD` - Fast-track limit (default: 25000)
//! * `FNOL_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `FNOL_LOG_FORMAT` - pretty or json (default: pretty)

use std::net::SocketAddr;
use tokio::net::TcpListener;

use interface_api::{config::FnolSettings, create_router, telemetry::init_tracing, AppState};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Settings cannot be loaded or fail validation
/// - The inference backend cannot be configured
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let settings = FnolSettings::load(None)?;
    init_tracing(&settings.log_level, settings.log_format);

    tracing::info!(
        host = %settings.server.host,
        port = %settings.server.port,
        backend = ?settings.inference.backend,
        "Starting FNOL triage API server"
    );

    let addr: SocketAddr = settings.server_addr().parse()?;
    let app = create_router(AppState::from_settings(settings)?);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
