//! Outcome of a seed or import run

use serde::Serialize;
use uuid::Uuid;

use crate::index::RecordId;
use crate::store::StoreError;

/// Error code for an import line that is not a JSON object
pub const MALFORMED_LINE_CODE: &str = "LOAN_MALFORMED_LINE";

/// One rejected input row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// 1-based line number (or row position for seed runs)
    pub line: usize,
    pub collection: &'static str,
    pub codes: Vec<&'static str>,
    pub messages: Vec<String>,
}

/// Accepted and rejected rows of one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub accepted: Vec<RecordId>,
    pub rejected: Vec<RowFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn accept(&mut self, id: RecordId) {
        self.accepted.push(id);
    }

    /// Records a rejected row from a store error.
    pub fn reject(&mut self, line: usize, collection: &'static str, err: &StoreError) {
        self.rejected.push(RowFailure {
            line,
            collection,
            codes: err.detail_codes(),
            messages: err.messages(),
        });
    }

    /// Records a line that could not be parsed at all.
    pub fn reject_malformed(&mut self, line: usize, collection: &'static str, reason: String) {
        self.rejected.push(RowFailure {
            line,
            collection,
            codes: vec![MALFORMED_LINE_CODE],
            messages: vec![reason],
        });
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Rejected line numbers, in input order
    pub fn rejected_lines(&self) -> Vec<usize> {
        self.rejected.iter().map(|f| f.line).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}
