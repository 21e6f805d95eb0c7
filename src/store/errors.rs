//! # Store Errors
//!
//! Error types for the record store. Validation failures and duplicate keys
//! travel through the same channel so callers see one error type per write.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::index::IndexError;
use crate::schema::{ConversionError, DuplicateKeyError, ValidationError};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    // ==================
    // Write Rejections
    // ==================
    /// Record failed schema validation (all violations inside)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unique index conflict
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),

    /// Input document could not be converted to a record
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Update attempted to change an immutable key
    #[error("[REJECT] LOAN_IMMUTABLE_KEY: {field} is immutable (existing {existing}, attempted {attempted})")]
    ImmutableKey {
        field: &'static str,
        existing: String,
        attempted: String,
    },

    /// Update target does not exist
    #[error("[REJECT] LOAN_NOT_FOUND: no {collection} record with {field} = {key}")]
    NotFound {
        collection: &'static str,
        field: &'static str,
        key: String,
    },

    /// Lookup on an undeclared index or with an unindexable value
    #[error(transparent)]
    Index(#[from] IndexError),

    // ==================
    // Storage Failures
    // ==================
    /// Disk I/O failure
    #[error("[ERROR] LOAN_STORAGE_IO_ERROR: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Log line failed its checksum or could not be decoded
    #[error("[FATAL] LOAN_DATA_CORRUPTION: {}:{line}: {reason}", .path.display())]
    Corrupted {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Log line decoded but the stored record no longer validates
    #[error("[FATAL] LOAN_INVALID_STORED_RECORD: {}:{line}: {source}", .path.display())]
    InvalidStoredRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: ValidationError,
    },

    /// A collection lock was poisoned by a panicking writer
    #[error("[FATAL] LOAN_LOCK_POISONED: collection {0}")]
    LockPoisoned(&'static str),
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(e) => e.code(),
            StoreError::DuplicateKey(e) => e.code(),
            StoreError::Conversion(e) => e.code(),
            StoreError::ImmutableKey { .. } => "LOAN_IMMUTABLE_KEY",
            StoreError::NotFound { .. } => "LOAN_NOT_FOUND",
            StoreError::Index(e) => e.code().code(),
            StoreError::Io { .. } => "LOAN_STORAGE_IO_ERROR",
            StoreError::Corrupted { .. } => "LOAN_DATA_CORRUPTION",
            StoreError::InvalidStoredRecord { .. } => "LOAN_INVALID_STORED_RECORD",
            StoreError::LockPoisoned(_) => "LOAN_LOCK_POISONED",
        }
    }

    /// Detailed codes: one per violation for validation failures,
    /// otherwise the single error code.
    pub fn detail_codes(&self) -> Vec<&'static str> {
        match self {
            StoreError::Validation(e) => e.codes(),
            other => vec![other.code()],
        }
    }

    /// Human-readable messages, one per violation for validation failures
    pub fn messages(&self) -> Vec<String> {
        match self {
            StoreError::Validation(e) => e.violations().iter().map(|v| v.to_string()).collect(),
            other => vec![other.to_string()],
        }
    }

    /// Whether the error rejects a single record rather than the store
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_)
                | StoreError::DuplicateKey(_)
                | StoreError::Conversion(_)
                | StoreError::ImmutableKey { .. }
                | StoreError::NotFound { .. }
                | StoreError::Index(_)
        )
    }
}
