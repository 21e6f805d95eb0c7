//! Schema type definitions
//!
//! Supported value kinds:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - real: 64-bit floating point (accepts int values)
//! - date: UTC timestamp
//! - object: nested mapping, content unchecked
//!
//! Booleans and lists are carried as values but no field declares them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// A semantic field value. Raw-text parsing happens before this point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null marker (distinct from an absent field)
    Null,
    /// UTF-8 string
    String(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Real(f64),
    /// UTC timestamp
    Date(DateTime<Utc>),
    /// Nested mapping
    Object(BTreeMap<String, FieldValue>),
    Bool(bool),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::String(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Real(_) => "real",
            FieldValue::Date(_) => "date",
            FieldValue::Object(_) => "object",
            FieldValue::Bool(_) => "bool",
            FieldValue::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of int and real values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::String(s) => write!(f, "\"{}\"", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Real(r) => write!(f, "{:?}", r),
            FieldValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            FieldValue::Object(map) => write!(f, "object({} keys)", map.len()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Array(items) => write!(f, "array({} items)", items.len()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(r: f64) -> Self {
        FieldValue::Real(r)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

/// A record: field name to value. Ordered for deterministic output.
pub type Record = BTreeMap<String, FieldValue>;

/// Declared scalar type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Real,
    Date,
    Object,
}

impl ValueKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Real => "real",
            ValueKind::Date => "date",
            ValueKind::Object => "object",
        }
    }

    /// Whether a (non-null) value satisfies this kind.
    ///
    /// Integers widen to reals; reals never narrow to integers.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (ValueKind::String, FieldValue::String(_))
                | (ValueKind::Int, FieldValue::Int(_))
                | (ValueKind::Real, FieldValue::Real(_))
                | (ValueKind::Real, FieldValue::Int(_))
                | (ValueKind::Date, FieldValue::Date(_))
                | (ValueKind::Object, FieldValue::Object(_))
        )
    }
}

/// A single declarative constraint on a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Field must be present
    Required,
    /// Value must be one of the listed literals (case-sensitive)
    Enum(&'static [&'static str]),
    /// Numeric value must lie in `[min, max]`; `max: None` is open-ended
    Range {
        min: f64,
        max: Option<f64>,
        nullable: bool,
    },
    /// Value must have the given kind
    Type { kind: ValueKind, nullable: bool },
}

/// Constraints declared for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    pub const fn new(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { field, constraints }
    }

    pub fn is_required(&self) -> bool {
        self.constraints.contains(&Constraint::Required)
    }
}

/// Storage-layer index declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: &'static str,
    pub unique: bool,
}

impl IndexSpec {
    pub const fn unique(field: &'static str) -> Self {
        Self { field, unique: true }
    }

    pub const fn non_unique(field: &'static str) -> Self {
        Self {
            field,
            unique: false,
        }
    }
}

/// The three record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    LoanApplication,
    LoanPrediction,
    LoanAnalytics,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::LoanApplication,
        RecordKind::LoanPrediction,
        RecordKind::LoanAnalytics,
    ];

    /// Snake-case name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::LoanApplication => "loan_application",
            RecordKind::LoanPrediction => "loan_prediction",
            RecordKind::LoanAnalytics => "loan_analytics",
        }
    }

    /// Storage collection name
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::LoanApplication => "loan_applications",
            RecordKind::LoanPrediction => "loan_predictions",
            RecordKind::LoanAnalytics => "loan_analytics",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    /// Accepts either the kind name or the collection name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.collection() == s)
            .ok_or_else(|| {
                format!(
                    "unknown record kind '{}'. Expected one of: loan_application, loan_prediction, loan_analytics",
                    s
                )
            })
    }
}

/// Complete schema for one record kind
#[derive(Debug)]
pub struct RecordSchema {
    pub kind: RecordKind,
    /// Field rules in evaluation order
    pub rules: &'static [FieldRule],
    pub indexes: &'static [IndexSpec],
}

impl RecordSchema {
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules
            .iter()
            .filter(|r| r.is_required())
            .map(|r| r.field)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indexes.iter().filter(|i| i.unique).map(|i| i.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_accepts_int() {
        assert!(ValueKind::Real.accepts(&FieldValue::Int(5)));
        assert!(ValueKind::Real.accepts(&FieldValue::Real(5.5)));
    }

    #[test]
    fn test_int_rejects_real() {
        assert!(!ValueKind::Int.accepts(&FieldValue::Real(1.0)));
        assert!(ValueKind::Int.accepts(&FieldValue::Int(1)));
    }

    #[test]
    fn test_kind_rejects_null() {
        for kind in [
            ValueKind::String,
            ValueKind::Int,
            ValueKind::Real,
            ValueKind::Date,
            ValueKind::Object,
        ] {
            assert!(!kind.accepts(&FieldValue::Null), "{}", kind.type_name());
        }
    }

    #[test]
    fn test_record_kind_parse() {
        assert_eq!(
            "loan_application".parse::<RecordKind>().unwrap(),
            RecordKind::LoanApplication
        );
        assert_eq!(
            "loan_predictions".parse::<RecordKind>().unwrap(),
            RecordKind::LoanPrediction
        );
        assert_eq!(
            "loan_analytics".parse::<RecordKind>().unwrap(),
            RecordKind::LoanAnalytics
        );
        assert!("loans".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FieldValue::from("male").to_string(), "\"male\"");
        assert_eq!(FieldValue::Real(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::Real(1.0).to_string(), "1.0");
        assert_eq!(FieldValue::Null.to_string(), "null");
    }
}
