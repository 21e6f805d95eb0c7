//! Batch import of JSON-lines documents

use std::io::BufRead;

use serde_json::Value;

use super::errors::{SeedError, SeedResult};
use super::report::BatchReport;
use crate::observability::{log_event_with_fields, Event, Timer};
use crate::schema::RecordKind;
use crate::store::Store;

/// Imports one JSON object per non-empty line into `kind`'s collection.
///
/// Malformed lines and rejected records are reported per line; only read
/// failures and store-level failures abort the batch.
pub fn import_jsonl<R: BufRead>(store: &Store, kind: RecordKind, mut reader: R) -> SeedResult<BatchReport> {
    let mut report = BatchReport::new();
    let run_id = report.run_id.to_string();
    let collection = kind.collection();
    let timer = Timer::new();

    log_event_with_fields(
        Event::ImportBegin,
        &[("collection", collection), ("run_id", run_id.as_str())],
    );

    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut lines_read = 0u64;
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(|source| SeedError::Io {
            context: format!("Failed to read import line {}", line_no + 1),
            source,
        })?;
        if n == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.trim_end_matches(['\n', '\r']),
            Err(e) => {
                lines_read += 1;
                report.reject_malformed(line_no, collection, format!("invalid UTF-8: {}", e));
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        lines_read += 1;

        let document: Value = match serde_json::from_str(line) {
            Ok(doc) => doc,
            Err(e) => {
                report.reject_malformed(line_no, collection, format!("invalid JSON: {}", e));
                continue;
            }
        };

        match store.insert_json(kind, &document) {
            Ok(id) => report.accept(id),
            Err(e) if e.is_rejection() => report.reject(line_no, collection, &e),
            Err(e) => {
                store.metrics().add_import_lines(lines_read);
                return Err(e.into());
            }
        }
    }

    store.metrics().add_import_lines(lines_read);

    let accepted = report.accepted_count().to_string();
    let rejected = report.rejected_count().to_string();
    let elapsed = timer.elapsed_ms();
    log_event_with_fields(
        Event::ImportComplete,
        &[
            ("accepted", accepted.as_str()),
            ("collection", collection),
            ("elapsed_ms", elapsed.as_str()),
            ("rejected", rejected.as_str()),
            ("run_id", run_id.as_str()),
        ],
    );

    Ok(report)
}
