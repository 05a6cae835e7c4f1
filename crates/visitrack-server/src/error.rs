//! HTTP mapping for ledger errors.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use visitrack_core::error::{ClientCode, LedgerError, INTERNAL_MESSAGE};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub LedgerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label for the error kind (lowercase form of `ClientCode`).
    pub fn kind(&self) -> &'static str {
        match self.0.client_code() {
            ClientCode::InvalidRequest => "invalid_request",
            ClientCode::Internal => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.client_code();
        match code {
            ClientCode::InvalidRequest => {
                tracing::warn!(code = code.as_str(), error = %self.0, "rejected request")
            }
            ClientCode::Internal => {
                tracing::error!(code = code.as_str(), error = %self.0, "request failed")
            }
        }
        let body = Json(json!({ "error": self.0.client_message() }));
        (status, body).into_response()
    }
}

/// `CatchPanicLayer` hook: a panicking handler answers like any internal error.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(%detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_MESSAGE })),
    )
        .into_response()
}
