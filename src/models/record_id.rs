//! Record identifiers for jobs and nodes.
//!
//! The API keys every collection by a string ID. Job IDs are Slurm job numbers,
//! node IDs are host names. Both views list records newest-first, so `RecordId`
//! carries a total order that compares numeric IDs as numbers and everything
//! else as text.

use std::cmp::Ordering;
use std::fmt;

/// Sort key derived from a raw ID string.
///
/// Variant order matters: `Text < Numeric`, so a descending sort places
/// numeric IDs (largest first) before non-numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum IdKey {
    Text(String),
    Numeric(u128),
}

/// Opaque record identifier as it appears in the API payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    raw: String,
    key: IdKey,
}

impl RecordId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = match raw.trim().parse::<u128>() {
            Ok(n) => IdKey::Numeric(n),
            Err(_) => IdKey::Text(raw.clone()),
        };
        Self { raw, key }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self.key, IdKey::Numeric(_))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        // Tie-break on the raw text so "007" and "7" still order deterministically
        self.key
            .cmp(&other.key)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Sort records in place, highest ID first.
pub fn sort_descending_by_id<T>(records: &mut [T], id: impl Fn(&T) -> &RecordId) {
    records.sort_by(|a, b| id(b).cmp(id(a)));
}
