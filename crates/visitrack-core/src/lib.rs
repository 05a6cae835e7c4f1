//! visitrack core: the visitor ledger, fingerprint validation, and error types.
//!
//! This crate holds everything the HTTP surface needs to count visitors. It
//! carries no transport or runtime dependencies so the ledger can be driven
//! directly from tests or from any other front end.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `LedgerError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod clock;
pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod service;

/// Shared result type.
pub use error::{LedgerError, Result};

pub use clock::{Clock, SystemClock};
pub use fingerprint::Fingerprint;
pub use ledger::{Ledger, LedgerSnapshot, TrackOutcome, VisitorRecord};
pub use service::{HealthStatus, LedgerService, StatsReport, TrackReport};
