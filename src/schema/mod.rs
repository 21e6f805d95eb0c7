//! Schema Validator subsystem for loandb
//!
//! Every record is validated against its kind's rule table before it is
//! admitted to storage.
//!
//! # Design Principles
//!
//! - Declarative rule tables, one generic interpreter
//! - All violations reported together, never fail-fast
//! - Unknown fields tolerated (non-strict schemas)
//! - Pure: no I/O, no shared mutable state
//!
//! Uniqueness (`loan_id`, `analysis_date`) is declared here but enforced by
//! the store, which reports `DuplicateKeyError`.

mod catalog;
mod errors;
mod types;
mod validator;
pub mod value;

pub use catalog::schema_for;
pub use errors::{
    DuplicateKeyError, ValidationError, ValidationResult, Violation, ViolationKind,
};
pub use types::{
    Constraint, FieldRule, FieldValue, IndexSpec, Record, RecordKind, RecordSchema, ValueKind,
};
pub use validator::{validate, Validator, ValidatorOptions};
pub use value::{record_from_json, record_to_json, ConversionError};
