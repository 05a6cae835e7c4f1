//! Visitor ledger service: the three operations exposed over HTTP.
//!
//! `LedgerService` owns the `Ledger` and a `Clock`. It is built once at
//! startup and shared by handlers; it performs validation before any
//! mutation, stamps times, and emits the per-visit log lines.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::ledger::{Ledger, TrackOutcome, VisitorRecord};

/// Wire format of timestamps: RFC 3339, UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body of a successful track call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReport {
    pub success: bool,
    pub unique_visitors: usize,
    pub total_views: u64,
    pub is_new_visitor: bool,
}

impl From<TrackOutcome> for TrackReport {
    fn from(out: TrackOutcome) -> Self {
        Self {
            success: true,
            unique_visitors: out.unique_visitors,
            total_views: out.total_views,
            is_new_visitor: out.is_new_visitor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub unique_visitors: usize,
    pub total_views: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub struct LedgerService {
    ledger: Ledger,
    clock: Arc<dyn Clock>,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl LedgerService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Ledger::new(),
            clock,
        }
    }

    /// Count one view for `fingerprint`. Nothing is mutated if the
    /// fingerprint is absent or empty.
    pub fn track_visitor(&self, fingerprint: Option<&str>) -> Result<TrackOutcome> {
        let fp = Fingerprint::parse(fingerprint)?;
        let out = self.ledger.track(&fp, self.clock.now())?;

        if out.is_new_visitor {
            tracing::info!(fingerprint = %fp, "new unique visitor");
        } else {
            tracing::info!(fingerprint = %fp, visit_count = out.visit_count, "returning visitor");
        }
        tracing::info!(
            unique_visitors = out.unique_visitors,
            total_views = out.total_views,
            "visitor totals"
        );

        Ok(out)
    }

    pub fn stats(&self) -> Result<StatsReport> {
        let snap = self.ledger.snapshot()?;
        Ok(StatsReport {
            unique_visitors: snap.unique_visitors,
            total_views: snap.total_views,
            timestamp: format_timestamp(self.clock.now()),
        })
    }

    /// Liveness only; never touches the ledger.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            message: "Backend is running",
        }
    }

    pub fn visitor(&self, fingerprint: &str) -> Result<Option<VisitorRecord>> {
        self.ledger.visitor(fingerprint)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
