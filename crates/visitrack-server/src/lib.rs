//! visitrack server library entry.
//!
//! Wires config, shared state, the visitor API, and operational endpoints into
//! an axum application. Consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;

use tokio::net::TcpListener;

use visitrack_core::error::{LedgerError, Result};

pub use app_state::AppState;

/// Bind `state`'s configured address.
pub async fn bind(state: &AppState) -> Result<TcpListener> {
    let addr = state.cfg().listen_addr()?;
    TcpListener::bind(addr)
        .await
        .map_err(|e| LedgerError::Internal(format!("failed to bind {addr}: {e}")))
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router::build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| LedgerError::Internal(format!("server failed: {e}")))
}
