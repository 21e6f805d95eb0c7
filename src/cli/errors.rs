//! CLI-specific error types
//!
//! Every CLI error ends the process with exit status 1.

use std::fmt;
use std::io;

use crate::seed::SeedError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout, input files)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Store could not be opened or written
    StoreFailed,
    /// The record given to `validate` was rejected
    RecordRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "LOAN_CLI_CONFIG_ERROR",
            Self::IoError => "LOAN_CLI_IO_ERROR",
            Self::AlreadyInitialized => "LOAN_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "LOAN_CLI_NOT_INITIALIZED",
            Self::StoreFailed => "LOAN_CLI_STORE_FAILED",
            Self::RecordRejected => "LOAN_CLI_RECORD_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'loandb init' first.",
        )
    }

    pub fn record_rejected(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RecordRejected, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreFailed, e.to_string())
    }
}

impl From<SeedError> for CliError {
    fn from(e: SeedError) -> Self {
        match e {
            SeedError::Io { .. } => Self::io_error(e.to_string()),
            SeedError::Store(inner) => inner.into(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_store_error_conversion() {
        let err: CliError = StoreError::Corrupted {
            path: PathBuf::from("loan_predictions.jsonl"),
            line: 2,
            reason: "checksum mismatch".into(),
        }
        .into();
        assert_eq!(err.code(), &CliErrorCode::StoreFailed);
        assert!(err.message().contains("LOAN_DATA_CORRUPTION"));
    }

    #[test]
    fn test_display_includes_code() {
        let err = CliError::not_initialized();
        assert!(err.to_string().starts_with("LOAN_CLI_NOT_INITIALIZED: "));
    }
}
