//! Shared application state for the visitrack server.
//!
//! The ledger service is built here once and handed to every handler through
//! axum's `State`; it lives until the server shuts down.

use std::sync::Arc;

use visitrack_core::{Clock, LedgerService, SystemClock};

use crate::config::ServerConfig;
use crate::obs::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    ledger: Arc<LedgerService>,
}

struct AppStateInner {
    cfg: ServerConfig,
    metrics: ServerMetrics,
}

impl AppState {
    pub fn new(cfg: ServerConfig) -> Self {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    pub fn with_clock(cfg: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: ServerMetrics::default(),
            }),
            ledger: Arc::new(LedgerService::new(clock)),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.inner.metrics
    }

    pub fn ledger(&self) -> Arc<LedgerService> {
        Arc::clone(&self.ledger)
    }
}
