//! Schema error types
//!
//! Violation codes:
//! - LOAN_MISSING_FIELD (MissingFieldError)
//! - LOAN_TYPE_MISMATCH (TypeMismatchError)
//! - LOAN_INVALID_ENUM_VALUE (InvalidEnumValueError)
//! - LOAN_RANGE_ERROR (RangeError)
//! - LOAN_CROSS_FIELD (opt-in analytics totals check)
//!
//! Storage conflicts use LOAN_DUPLICATE_KEY (DuplicateKeyError) and are
//! reported individually, never aggregated with validation violations.

use std::fmt;

use super::types::RecordKind;

/// Kind of a single validation violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Required field absent
    MissingField,
    /// Value has the wrong type
    TypeMismatch,
    /// Value not in the declared enumeration
    InvalidEnumValue,
    /// Numeric value outside the declared bounds
    Range,
    /// Relationship between fields does not hold
    CrossField,
}

impl ViolationKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "LOAN_MISSING_FIELD",
            ViolationKind::TypeMismatch => "LOAN_TYPE_MISMATCH",
            ViolationKind::InvalidEnumValue => "LOAN_INVALID_ENUM_VALUE",
            ViolationKind::Range => "LOAN_RANGE_ERROR",
            ViolationKind::CrossField => "LOAN_CROSS_FIELD",
        }
    }

    /// Returns the taxonomy name
    pub fn error_name(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "MissingFieldError",
            ViolationKind::TypeMismatch => "TypeMismatchError",
            ViolationKind::InvalidEnumValue => "InvalidEnumValueError",
            ViolationKind::Range => "RangeError",
            ViolationKind::CrossField => "CrossFieldError",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single violation found in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(
            ViolationKind::MissingField,
            field,
            "field to be present",
            "missing",
        )
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ViolationKind::TypeMismatch, field, expected, actual)
    }

    pub fn invalid_enum(
        field: impl Into<String>,
        allowed: &[&str],
        actual: impl Into<String>,
    ) -> Self {
        Self::new(
            ViolationKind::InvalidEnumValue,
            field,
            format!("one of [{}]", allowed.join(", ")),
            actual,
        )
    }

    pub fn out_of_range(
        field: impl Into<String>,
        min: f64,
        max: Option<f64>,
        actual: impl Into<String>,
    ) -> Self {
        let expected = match max {
            Some(max) => format!("value in [{}, {}]", min, max),
            None => format!("value >= {}", min),
        };
        Self::new(ViolationKind::Range, field, expected, actual)
    }

    pub fn cross_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ViolationKind::CrossField, field, expected, actual)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on field '{}': expected {}, got {}",
            self.kind.error_name(),
            self.field,
            self.expected,
            self.actual
        )
    }
}

/// Aggregated validation failure for one record.
///
/// Holds every violation found, in rule order. Never empty.
#[derive(Debug, Clone)]
pub struct ValidationError {
    kind: RecordKind,
    violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn new(kind: RecordKind, violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { kind, violations }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "LOAN_VALIDATION_FAILED"
    }

    /// Record kind that was validated
    pub fn record_kind(&self) -> RecordKind {
        self.kind
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Whether a violation of `kind` was reported on `field`
    pub fn has(&self, kind: ViolationKind, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.kind == kind && v.field == field)
    }

    /// Number of violations of the given kind
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Codes of all violations, in report order
    pub fn codes(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.kind.code()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[REJECT] {}: {} record has {} violation(s)",
            self.code(),
            self.kind.collection(),
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "; {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Unique-key conflict reported by the storage layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    pub collection: &'static str,
    pub field: &'static str,
    /// Rendered key value
    pub key: String,
}

impl DuplicateKeyError {
    pub fn new(collection: &'static str, field: &'static str, key: impl Into<String>) -> Self {
        Self {
            collection,
            field,
            key: key.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "LOAN_DUPLICATE_KEY"
    }

    /// Returns the taxonomy name
    pub fn error_name(&self) -> &'static str {
        "DuplicateKeyError"
    }
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[REJECT] {}: {}.{} already contains key {}",
            self.code(),
            self.collection,
            self.field,
            self.key
        )
    }
}

impl std::error::Error for DuplicateKeyError {}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
