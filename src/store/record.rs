//! Collection log line format
//!
//! One line per write:
//!
//! ```text
//! <crc32 as 8 lowercase hex digits> <json entry>
//! ```
//!
//! The checksum covers the JSON bytes only. The entry carries the record id,
//! the operation and the full record; latest line per id wins on replay.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::checksum::{compute_checksum, verify_checksum};
use crate::index::RecordId;

/// Write operation recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOp {
    Insert,
    Update,
}

/// A single decoded log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: RecordId,
    pub op: LogOp,
    /// Full record as JSON (dates in `{"$date": ...}` form)
    pub record: Value,
}

impl LogEntry {
    pub fn new(id: RecordId, op: LogOp, record: Value) -> Self {
        Self { id, op, record }
    }

    /// Encodes the entry as one log line, without the trailing newline.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        let checksum = compute_checksum(json.as_bytes());
        Ok(format!("{:08x} {}", checksum, json))
    }

    /// Decodes one log line, verifying its checksum.
    ///
    /// Returns a human-readable reason on failure.
    pub fn decode(line: &str) -> Result<Self, String> {
        let (hex, json) = line
            .split_once(' ')
            .ok_or_else(|| "missing checksum separator".to_string())?;

        if hex.len() != 8 {
            return Err(format!("malformed checksum '{}'", hex));
        }
        let expected = u32::from_str_radix(hex, 16)
            .map_err(|_| format!("malformed checksum '{}'", hex))?;

        if !verify_checksum(json.as_bytes(), expected) {
            return Err("checksum mismatch".to_string());
        }

        serde_json::from_str(json).map_err(|e| format!("invalid entry JSON: {}", e))
    }
}
