//! Append-only collection log writer
//!
//! - One file per collection: `<data_dir>/collections/<collection>.jsonl`
//! - Lines are appended, never rewritten
//! - With fsync enabled, a write is not acknowledged before `sync_data`

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::record::LogEntry;
use crate::schema::RecordKind;

/// Directory under the data dir holding collection logs
pub const COLLECTIONS_DIR: &str = "collections";

/// Returns the log path of a collection.
pub fn log_path(data_dir: &Path, kind: RecordKind) -> PathBuf {
    data_dir
        .join(COLLECTIONS_DIR)
        .join(format!("{}.jsonl", kind.collection()))
}

/// Append handle for one collection log
#[derive(Debug)]
pub struct LogWriter {
    path: PathBuf,
    file: File,
    fsync: bool,
}

impl LogWriter {
    /// Opens or creates the log, creating parent directories if needed.
    pub fn open(path: &Path, fsync: bool) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StoreError::io(format!("Failed to open {}", path.display()), e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            fsync,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry as a single line.
    pub fn append(&mut self, entry: &LogEntry) -> StoreResult<()> {
        let mut line = entry.encode().map_err(|e| {
            StoreError::io(
                format!("Failed to encode entry {}", entry.id),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        line.push('\n');

        // Single write call per line
        self.file
            .write_all(line.as_bytes())
            .map_err(|e| StoreError::io(format!("Failed to append to {}", self.path.display()), e))?;

        if self.fsync {
            self.file
                .sync_data()
                .map_err(|e| StoreError::io(format!("Failed to sync {}", self.path.display()), e))?;
        }

        Ok(())
    }
}
