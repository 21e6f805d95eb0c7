//! # Seed Errors
//!
//! Batch-level failures only. Record errors never abort a batch; they land
//! in the `BatchReport` instead.

use std::io;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for seed and import operations
pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Error)]
pub enum SeedError {
    /// Reading the input failed
    #[error("[ERROR] LOAN_IMPORT_IO_ERROR: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The store failed in a way that affects every later record
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SeedError {
    pub fn code(&self) -> &'static str {
        match self {
            SeedError::Io { .. } => "LOAN_IMPORT_IO_ERROR",
            SeedError::Store(e) => e.code(),
        }
    }
}
