//! Shared error type across visitrack crates.

use thiserror::Error;

/// Message returned to clients when a fingerprint is missing or unusable.
pub const FINGERPRINT_REQUIRED: &str = "Fingerprint is required";

/// Generic message for any fault the client is not allowed to see.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Missing or malformed input.
    InvalidRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in server logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidRequest => "INVALID_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            LedgerError::InvalidRequest(_) => ClientCode::InvalidRequest,
            LedgerError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Text that may be shown to a client. Internal details never leak.
    pub fn client_message(&self) -> &str {
        match self {
            LedgerError::InvalidRequest(msg) => msg,
            LedgerError::Internal(_) => INTERNAL_MESSAGE,
        }
    }

    pub fn fingerprint_required() -> Self {
        LedgerError::InvalidRequest(FINGERPRINT_REQUIRED.to_string())
    }
}
