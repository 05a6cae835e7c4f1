//! visitrack server
//!
//! - `GET  /health`
//! - `POST /api/track-visitor`
//! - `GET  /api/stats`
//! - `GET  /metrics`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visitrack_core::error::{LedgerError, Result};
use visitrack_server::{bind, config, serve, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let state = AppState::new(cfg);

    let listener = bind(&state).await?;
    let local = listener
        .local_addr()
        .map_err(|e| LedgerError::Internal(format!("no local address: {e}")))?;
    let port = local.port();

    tracing::info!(%local, "visitor tracker backend running on port {port}");
    tracing::info!("health check: http://localhost:{port}/health");
    tracing::info!("stats: http://localhost:{port}/api/stats");

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
