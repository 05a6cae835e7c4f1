//! In-memory visitor ledger.
//!
//! The ledger maps fingerprints to `VisitorRecord`s and keeps a global view
//! counter. A single mutex guards both so a track call's lookup, create-or-update,
//! and counter increment are observed as one step by concurrent callers.
//! Records are never evicted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::fingerprint::Fingerprint;

/// Everything known about one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub first_visit: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
    /// Always >= 1.
    pub visit_count: u64,
}

impl VisitorRecord {
    fn first(now: DateTime<Utc>) -> Self {
        Self {
            first_visit: now,
            last_visit: now,
            visit_count: 1,
        }
    }

    fn revisit(&mut self, now: DateTime<Utc>) {
        self.last_visit = now;
        self.visit_count += 1;
    }
}

/// Result of one track call, read under the same lock that applied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOutcome {
    pub unique_visitors: usize,
    pub total_views: u64,
    pub is_new_visitor: bool,
    /// Visit count of the tracked fingerprint after this call.
    pub visit_count: u64,
}

/// Aggregate counters at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerSnapshot {
    pub unique_visitors: usize,
    pub total_views: u64,
}

#[derive(Default)]
struct LedgerInner {
    visitors: HashMap<String, VisitorRecord>,
    total_views: u64,
}

impl LedgerInner {
    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            unique_visitors: self.visitors.len(),
            total_views: self.total_views,
        }
    }
}

#[derive(Default)]
pub struct Ledger {
    inner: Mutex<LedgerInner>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerInner>> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::Internal("ledger lock poisoned".into()))
    }

    /// Record one view for `fingerprint` at `now`.
    pub fn track(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> Result<TrackOutcome> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        let (is_new_visitor, visit_count) = match inner.visitors.get_mut(fingerprint.as_str()) {
            Some(record) => {
                record.revisit(now);
                (false, record.visit_count)
            }
            None => {
                inner
                    .visitors
                    .insert(fingerprint.as_str().to_string(), VisitorRecord::first(now));
                (true, 1)
            }
        };
        inner.total_views += 1;

        let snap = inner.snapshot();
        Ok(TrackOutcome {
            unique_visitors: snap.unique_visitors,
            total_views: snap.total_views,
            is_new_visitor,
            visit_count,
        })
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    pub fn visitor(&self, fingerprint: &str) -> Result<Option<VisitorRecord>> {
        Ok(self.lock()?.visitors.get(fingerprint).cloned())
    }
}
