//! Record validator
//!
//! Validation semantics:
//! - Every required field is present
//! - Enumerated fields hold one of the declared literals (case-sensitive)
//! - Typed fields hold a value of the declared kind, or null when nullable
//! - Numeric fields lie within their declared bounds, or are null when nullable
//! - Undeclared fields pass through untouched
//!
//! All violations are collected; validation never stops at the first one.
//! The validator holds no mutable state and performs no I/O.

use super::catalog::schema_for;
use super::errors::{ValidationError, ValidationResult, Violation};
use super::types::{Constraint, FieldRule, FieldValue, Record, RecordKind};

/// Switches for checks beyond the declarative catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Reject analytics snapshots where approved + rejected > total
    pub enforce_analytics_totals: bool,
}

/// Validator that evaluates the catalog rule tables against records.
///
/// `Copy` and stateless: share it freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Validates a record of the given kind.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` listing every violation, in rule order.
    pub fn validate(&self, kind: RecordKind, record: &Record) -> ValidationResult<()> {
        let mut violations = check_rules(schema_for(kind).rules, record);

        if self.options.enforce_analytics_totals && kind == RecordKind::LoanAnalytics {
            violations.extend(check_analytics_totals(record));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(kind, violations))
        }
    }

    /// Validates and hands the record back unchanged on success.
    pub fn admit(&self, kind: RecordKind, record: Record) -> ValidationResult<Record> {
        self.validate(kind, &record)?;
        Ok(record)
    }
}

/// Validates with default options.
pub fn validate(kind: RecordKind, record: &Record) -> ValidationResult<()> {
    Validator::default().validate(kind, record)
}

/// Folds every rule of a table over the record.
fn check_rules(rules: &[FieldRule], record: &Record) -> Vec<Violation> {
    rules.iter().fold(Vec::new(), |mut acc, rule| {
        check_field(rule, record.get(rule.field), &mut acc);
        acc
    })
}

/// Evaluates one field rule against the (possibly absent) value.
fn check_field(rule: &FieldRule, value: Option<&FieldValue>, out: &mut Vec<Violation>) {
    let Some(value) = value else {
        if rule.is_required() {
            out.push(Violation::missing_field(rule.field));
        }
        return;
    };

    // A value of the wrong type is not range-checked as well.
    let mut type_failed = false;

    for constraint in rule.constraints {
        match *constraint {
            Constraint::Required => {}
            Constraint::Type { kind, nullable } => {
                if value.is_null() && nullable {
                    continue;
                }
                if !kind.accepts(value) {
                    type_failed = true;
                    out.push(Violation::type_mismatch(
                        rule.field,
                        expected_type(kind.type_name(), nullable),
                        value.type_name(),
                    ));
                }
            }
            Constraint::Enum(allowed) => {
                let member = value.as_str().is_some_and(|s| allowed.contains(&s));
                if !member {
                    out.push(Violation::invalid_enum(rule.field, allowed, value.to_string()));
                }
            }
            Constraint::Range { min, max, nullable } => {
                if type_failed || (value.is_null() && nullable) {
                    continue;
                }
                match value.as_f64() {
                    Some(n) if in_range(n, min, max) => {}
                    Some(_) => out.push(Violation::out_of_range(
                        rule.field,
                        min,
                        max,
                        value.to_string(),
                    )),
                    None => out.push(Violation::type_mismatch(
                        rule.field,
                        expected_type("number", nullable),
                        value.type_name(),
                    )),
                }
            }
        }
    }
}

/// NaN and infinities are never in range.
fn in_range(n: f64, min: f64, max: Option<f64>) -> bool {
    n.is_finite() && n >= min && max.map_or(true, |max| n <= max)
}

fn expected_type(name: &str, nullable: bool) -> String {
    if nullable {
        format!("{} or null", name)
    } else {
        name.to_string()
    }
}

/// approved_loans + rejected_loans must not exceed total_applications.
///
/// Only evaluated when all three are integers; type problems are already
/// reported by the rule table.
fn check_analytics_totals(record: &Record) -> Option<Violation> {
    let int = |field: &str| record.get(field).and_then(FieldValue::as_i64);
    let (total, approved, rejected) = (
        int("total_applications")?,
        int("approved_loans")?,
        int("rejected_loans")?,
    );

    let decided = i128::from(approved) + i128::from(rejected);
    if decided > i128::from(total) {
        Some(Violation::cross_field(
            "approved_loans",
            format!(
                "approved_loans + rejected_loans <= total_applications ({})",
                total
            ),
            format!("{} + {} = {}", approved, rejected, decided),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::ViolationKind;
    use crate::schema::value::record_from_json;
    use serde_json::{json, Value};

    fn record(doc: Value) -> Record {
        record_from_json(&doc).unwrap()
    }

    fn application() -> Record {
        record(json!({
            "loan_id": "LP001002",
            "gender": "Male",
            "married": "No",
            "dependents": "0",
            "education": "Graduate",
            "self_employed": "No",
            "applicant_income": 5849.0,
            "coapplicant_income": 0.0,
            "property_area": "Urban",
            "loan_status": "Y"
        }))
    }

    fn analytics(total: i64, approved: i64, rejected: i64) -> Record {
        record(json!({
            "analysis_date": { "$date": "2024-01-01" },
            "total_applications": total,
            "approved_loans": approved,
            "rejected_loans": rejected,
            "approval_rate": 68.73
        }))
    }

    #[test]
    fn test_valid_application_passes() {
        assert!(validate(RecordKind::LoanApplication, &application()).is_ok());
    }

    #[test]
    fn test_admit_returns_record_unchanged() {
        let original = application();
        let admitted = Validator::default()
            .admit(RecordKind::LoanApplication, original.clone())
            .unwrap();
        assert_eq!(admitted, original);
    }

    #[test]
    fn test_all_violations_collected() {
        let mut rec = application();
        rec.remove("gender");
        rec.insert("married".into(), "maybe".into());
        rec.insert("applicant_income".into(), FieldValue::Real(-1.0));

        let err = validate(RecordKind::LoanApplication, &rec).unwrap_err();
        assert_eq!(
            err.codes(),
            vec![
                "LOAN_MISSING_FIELD",
                "LOAN_INVALID_ENUM_VALUE",
                "LOAN_RANGE_ERROR"
            ]
        );
    }

    #[test]
    fn test_type_failure_skips_range() {
        let mut rec = application();
        rec.insert("applicant_income".into(), "5849".into());

        let err = validate(RecordKind::LoanApplication, &rec).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has(ViolationKind::TypeMismatch, "applicant_income"));
    }

    #[test]
    fn test_null_on_required_non_nullable_field() {
        let mut rec = application();
        rec.insert("applicant_income".into(), FieldValue::Null);

        let err = validate(RecordKind::LoanApplication, &rec).unwrap_err();
        assert!(err.has(ViolationKind::TypeMismatch, "applicant_income"));
        assert_eq!(err.count(ViolationKind::MissingField), 0);
    }

    #[test]
    fn test_enum_rejects_non_string() {
        let mut rec = application();
        rec.insert("dependents".into(), FieldValue::Int(0));

        let err = validate(RecordKind::LoanApplication, &rec).unwrap_err();
        assert!(err.has(ViolationKind::InvalidEnumValue, "dependents"));
    }

    #[test]
    fn test_nan_out_of_range() {
        let mut rec = application();
        rec.insert("loan_amount".into(), FieldValue::Real(f64::NAN));

        let err = validate(RecordKind::LoanApplication, &rec).unwrap_err();
        assert!(err.has(ViolationKind::Range, "loan_amount"));
    }

    #[test]
    fn test_nullable_type_message() {
        let mut rec = application();
        rec.insert("credit_history".into(), "1".into());

        let err = validate(RecordKind::LoanApplication, &rec).unwrap_err();
        assert_eq!(err.violations()[0].expected, "int or null");
    }

    #[test]
    fn test_analytics_totals_off_by_default() {
        assert!(validate(RecordKind::LoanAnalytics, &analytics(10, 8, 5)).is_ok());
    }

    #[test]
    fn test_analytics_totals_enforced_when_enabled() {
        let validator = Validator::new(ValidatorOptions {
            enforce_analytics_totals: true,
        });

        assert!(validator
            .validate(RecordKind::LoanAnalytics, &analytics(614, 422, 192))
            .is_ok());

        let err = validator
            .validate(RecordKind::LoanAnalytics, &analytics(10, 8, 5))
            .unwrap_err();
        assert!(err.has(ViolationKind::CrossField, "approved_loans"));
    }

    #[test]
    fn test_analytics_totals_ignore_other_kinds() {
        let validator = Validator::new(ValidatorOptions {
            enforce_analytics_totals: true,
        });
        assert!(validator
            .validate(RecordKind::LoanApplication, &application())
            .is_ok());
    }
}
