//! Collection log reader with strict corruption detection
//!
//! - Every line validates its checksum
//! - Any checksum or decode failure aborts the replay

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use super::errors::{StoreError, StoreResult};
use super::record::LogEntry;

/// Reads every entry of a collection log in file order.
///
/// A missing file is an empty log. Blank lines are skipped.
/// Returns `(line_number, entry)` pairs, line numbers starting at 1.
pub fn read_log(path: &Path) -> StoreResult<Vec<(usize, LogEntry)>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(format!("Failed to open {}", path.display()), e)),
    };

    let mut entries = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => StoreError::Corrupted {
                path: path.to_path_buf(),
                line: line_no,
                reason: "invalid UTF-8".into(),
            },
            _ => StoreError::io(format!("Failed to read {}", path.display()), e),
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let entry = LogEntry::decode(&line).map_err(|reason| StoreError::Corrupted {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        })?;
        entries.push((line_no, entry));
    }

    Ok(entries)
}
