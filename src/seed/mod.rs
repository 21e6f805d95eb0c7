//! Seed data and batch import
//!
//! Both paths write through `Store::insert`, so every row is validated and
//! unique-checked exactly like a single write. A rejected row is recorded in
//! the `BatchReport`; the batch carries on.

mod errors;
mod import;
mod report;
mod samples;

pub use errors::{SeedError, SeedResult};
pub use import::import_jsonl;
pub use report::{BatchReport, RowFailure, MALFORMED_LINE_CODE};
pub use samples::sample_records;

use crate::observability::{log_event_with_fields, Event};
use crate::store::Store;

/// Loads the bootstrap rows into the store.
///
/// Rows already present are reported as duplicate-key rejections.
pub fn load_samples(store: &Store) -> SeedResult<BatchReport> {
    let mut report = BatchReport::new();
    let run_id = report.run_id.to_string();
    log_event_with_fields(Event::SeedBegin, &[("run_id", run_id.as_str())]);

    for (position, (kind, document)) in sample_records().into_iter().enumerate() {
        match store.insert_json(kind, &document) {
            Ok(id) => report.accept(id),
            Err(e) if e.is_rejection() => report.reject(position + 1, kind.collection(), &e),
            Err(e) => return Err(e.into()),
        }
    }

    let accepted = report.accepted_count().to_string();
    let rejected = report.rejected_count().to_string();
    log_event_with_fields(
        Event::SeedComplete,
        &[
            ("accepted", accepted.as_str()),
            ("rejected", rejected.as_str()),
            ("run_id", run_id.as_str()),
        ],
    );
    Ok(report)
}
