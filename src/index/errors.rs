//! Index error types
//!
//! Error codes:
//! - LOAN_INDEX_NOT_DECLARED (REJECT)
//! - LOAN_INDEX_KEY_UNSUPPORTED (REJECT)

use std::fmt;

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Lookup on a field with no declared index
    LoanIndexNotDeclared,
    /// Lookup value cannot form an index key (null, object)
    LoanIndexKeyUnsupported,
}

impl IndexErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::LoanIndexNotDeclared => "LOAN_INDEX_NOT_DECLARED",
            IndexErrorCode::LoanIndexKeyUnsupported => "LOAN_INDEX_KEY_UNSUPPORTED",
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error type with full context
#[derive(Debug, Clone)]
pub struct IndexError {
    code: IndexErrorCode,
    message: String,
}

impl IndexError {
    /// Create a not-declared error
    pub fn not_declared(collection: &str, field: &str) -> Self {
        Self {
            code: IndexErrorCode::LoanIndexNotDeclared,
            message: format!("No index declared on {}.{}", collection, field),
        }
    }

    /// Create an unsupported-key error
    pub fn unsupported_key(field: &str, type_name: &str) -> Self {
        Self {
            code: IndexErrorCode::LoanIndexKeyUnsupported,
            message: format!("Cannot look up {} by a {} value", field, type_name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for IndexError {}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            IndexErrorCode::LoanIndexNotDeclared.code(),
            "LOAN_INDEX_NOT_DECLARED"
        );
        assert_eq!(
            IndexErrorCode::LoanIndexKeyUnsupported.code(),
            "LOAN_INDEX_KEY_UNSUPPORTED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = IndexError::not_declared("loan_predictions", "model_version");
        let display = err.to_string();
        assert!(display.contains("LOAN_INDEX_NOT_DECLARED"));
        assert!(display.contains("loan_predictions.model_version"));
    }
}
