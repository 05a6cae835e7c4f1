//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use visitrack_core::service::HealthStatus;

use crate::app_state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.ledger().health())
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let ledger = state.ledger();
    let snap = match ledger.ledger().snapshot() {
        Ok(snap) => snap,
        Err(e) => return crate::error::ApiError::from(e).into_response(),
    };
    let gauges = [
        ("visitrack_unique_visitors", snap.unique_visitors as u64),
        ("visitrack_total_views", snap.total_views),
    ];
    let body = state.metrics().render(&gauges);

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
