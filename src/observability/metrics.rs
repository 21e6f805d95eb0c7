//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one store
///
/// All counters use Relaxed atomics; values are exact once writers quiesce.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Records run through the validator (writes and replays)
    records_validated: AtomicU64,
    /// Records rejected by the validator
    records_rejected: AtomicU64,
    /// Records written to a collection
    records_stored: AtomicU64,
    /// Writes rejected by a unique index
    duplicate_keys: AtomicU64,
    /// Non-empty lines read by batch import
    import_lines: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_validated(&self) {
        self.records_validated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_validated(&self, records: u64) {
        self.records_validated.fetch_add(records, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.records_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_stored(&self) {
        self.records_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicate_keys(&self) {
        self.duplicate_keys.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_import_lines(&self, lines: u64) {
        self.import_lines.fetch_add(lines, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_validated: self.records_validated.load(Ordering::Relaxed),
            records_rejected: self.records_rejected.load(Ordering::Relaxed),
            records_stored: self.records_stored.load(Ordering::Relaxed),
            duplicate_keys: self.duplicate_keys.load(Ordering::Relaxed),
            import_lines: self.import_lines.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_validated: u64,
    pub records_rejected: u64,
    pub records_stored: u64,
    pub duplicate_keys: u64,
    pub import_lines: u64,
}
