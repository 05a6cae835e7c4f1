//! Visitor API handlers.
//!
//! - `POST /api/track-visitor` : count one view
//! - `GET  /api/stats`         : aggregate counters

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use visitrack_core::error::LedgerError;
use visitrack_core::service::{StatsReport, TrackReport};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};

/// Kept loose so a wrong-typed `fingerprint` is reported as missing rather
/// than as a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub fingerprint: Option<Value>,
}

impl TrackRequest {
    fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_ref().and_then(Value::as_str)
    }
}

pub async fn track_visitor(
    State(state): State<AppState>,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> ApiResult<Json<TrackReport>> {
    let started = Instant::now();
    let result = track(&state, payload);
    state
        .metrics()
        .track_duration
        .observe(&[], started.elapsed());

    result.map(Json).map_err(|e| record_error(&state, "track-visitor", e))
}

fn track(
    state: &AppState,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<TrackReport, ApiError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable track body");
            return Err(LedgerError::fingerprint_required().into());
        }
    };

    let out = state.ledger().track_visitor(req.fingerprint())?;
    let outcome = if out.is_new_visitor { "new" } else { "returning" };
    state.metrics().track_total.inc(&[("outcome", outcome)]);

    Ok(out.into())
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsReport>> {
    state
        .ledger()
        .stats()
        .map(Json)
        .map_err(|e| record_error(&state, "stats", e.into()))
}

fn record_error(state: &AppState, route: &str, err: ApiError) -> ApiError {
    state
        .metrics()
        .request_errors
        .inc(&[("route", route), ("kind", err.kind())]);
    err
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::config::ServerConfig;

    fn state() -> AppState {
        AppState::new(ServerConfig::default())
    }

    fn body(v: Value) -> Result<Json<TrackRequest>, JsonRejection> {
        Ok(Json(serde_json::from_value(v).unwrap()))
    }

    #[tokio::test]
    async fn track_then_stats() {
        let st = state();
        let Json(r) = track_visitor(State(st.clone()), body(json!({"fingerprint": "abc"})))
            .await
            .unwrap();
        assert!(r.success && r.is_new_visitor);

        let Json(s) = stats(State(st.clone())).await.unwrap();
        assert_eq!((s.unique_visitors, s.total_views), (1, 1));
        assert_eq!(st.metrics().track_total.get(&[("outcome", "new")]), 1);
    }

    #[tokio::test]
    async fn non_string_fingerprints_are_rejected() {
        let st = state();
        for v in [json!({}), json!({"fingerprint": null}), json!({"fingerprint": ""}), json!({"fingerprint": 42})] {
            let err = track_visitor(State(st.clone()), body(v)).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }

        assert_eq!(st.ledger().stats().unwrap().total_views, 0);
        assert_eq!(
            st.metrics()
                .request_errors
                .get(&[("route", "track-visitor"), ("kind", "invalid_request")]),
            4
        );
    }
}
