//! Visitor fingerprint validation.

use std::fmt;

use crate::error::{LedgerError, Result};

/// Number of leading characters kept when a fingerprint is written to logs.
const LOG_PREFIX_CHARS: usize = 8;

/// Opaque, non-empty client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Accepts any non-empty string. Absence and `""` are rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(s) if !s.is_empty() => Ok(Self(s.to_string())),
            _ => Err(LedgerError::fingerprint_required()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe prefix, e.g. `3f9a1c0b...`.
    pub fn short(&self) -> String {
        let mut prefix: String = self.0.chars().take(LOG_PREFIX_CHARS).collect();
        prefix.push_str("...");
        prefix
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}
