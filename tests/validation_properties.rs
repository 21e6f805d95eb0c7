//! Validation Property Tests
//!
//! - Valid records are accepted with zero violations
//! - One MissingFieldError per missing required field
//! - Enumerations are exact and case-sensitive
//! - Numeric bounds are inclusive
//! - Nullable fields accept null
//! - Unknown fields are tolerated
//! - Validation is deterministic

use loandb::schema::{
    record_from_json, schema_for, validate, FieldValue, Record, RecordKind, Validator,
    ValidatorOptions, ViolationKind,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(doc: &Value) -> Record {
    record_from_json(doc).expect("document converts")
}

fn scenario_application() -> Value {
    json!({
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
    })
}

fn prediction() -> Value {
    json!({
        "loan_id": "LP001002",
        "predicted_status": "Approved",
        "confidence_score": 0.85,
        "probability_approved": 0.85,
        "model_version": "v1.0",
        "prediction_created_at": { "$date": "2024-01-01T10:00:00Z" }
    })
}

fn analytics() -> Value {
    json!({
        "analysis_date": { "$date": "2024-01-01" },
        "total_applications": 614,
        "approved_loans": 422,
        "rejected_loans": 192,
        "approval_rate": 68.73
    })
}

fn with(mut doc: Value, field: &str, value: Value) -> Value {
    doc[field] = value;
    doc
}

fn without(mut doc: Value, fields: &[&str]) -> Value {
    let obj = doc.as_object_mut().unwrap();
    for field in fields {
        obj.remove(*field);
    }
    doc
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_valid_application_accepted() {
    assert!(validate(RecordKind::LoanApplication, &record(&scenario_application())).is_ok());
}

#[test]
fn test_scenario_lowercase_gender_rejected() {
    let doc = with(scenario_application(), "gender", json!("male"));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();

    assert_eq!(err.violations().len(), 1);
    assert!(err.has(ViolationKind::InvalidEnumValue, "gender"));
}

#[test]
fn test_scenario_confidence_above_one_rejected() {
    let doc = with(prediction(), "confidence_score", json!(1.5));
    let err = validate(RecordKind::LoanPrediction, &record(&doc)).unwrap_err();

    assert_eq!(err.violations().len(), 1);
    assert!(err.has(ViolationKind::Range, "confidence_score"));
}

// =============================================================================
// Required Fields
// =============================================================================

#[test]
fn test_each_missing_required_field_reported_once() {
    let cases = [
        (RecordKind::LoanApplication, scenario_application()),
        (RecordKind::LoanPrediction, prediction()),
        (RecordKind::LoanAnalytics, analytics()),
    ];

    for (kind, doc) in cases {
        let required: Vec<&str> = schema_for(kind).required_fields().collect();
        assert!(!required.is_empty());

        for field in &required {
            let err = validate(kind, &record(&without(doc.clone(), &[*field]))).unwrap_err();
            assert_eq!(err.count(ViolationKind::MissingField), 1, "{} {}", kind, field);
            assert!(err.has(ViolationKind::MissingField, field));
        }

        let err = validate(kind, &record(&without(doc.clone(), &required))).unwrap_err();
        assert_eq!(err.count(ViolationKind::MissingField), required.len());
    }
}

#[test]
fn test_empty_application_reports_all_required() {
    let err = validate(RecordKind::LoanApplication, &Record::new()).unwrap_err();
    assert_eq!(err.count(ViolationKind::MissingField), 10);
    assert_eq!(err.violations().len(), 10);
}

// =============================================================================
// Enumerations
// =============================================================================

#[test]
fn test_enum_values_are_case_sensitive() {
    let cases = [
        ("married", json!("yes")),
        ("dependents", json!("4")),
        ("education", json!("graduate")),
        ("self_employed", json!("NO")),
        ("property_area", json!("SemiUrban")),
        ("loan_status", json!("y")),
    ];

    for (field, value) in cases {
        let doc = with(scenario_application(), field, value);
        let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
        assert!(err.has(ViolationKind::InvalidEnumValue, field), "{}", field);
    }
}

#[test]
fn test_every_enum_literal_accepted() {
    for dependents in ["0", "1", "2", "3+"] {
        let doc = with(scenario_application(), "dependents", json!(dependents));
        assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());
    }
    for area in ["Urban", "Semiurban", "Rural"] {
        let doc = with(scenario_application(), "property_area", json!(area));
        assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());
    }
    for status in ["Approved", "Rejected"] {
        let doc = with(prediction(), "predicted_status", json!(status));
        assert!(validate(RecordKind::LoanPrediction, &record(&doc)).is_ok());
    }
}

#[test]
fn test_non_string_enum_value_rejected() {
    let doc = with(scenario_application(), "gender", json!(1));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::InvalidEnumValue, "gender"));
}

// =============================================================================
// Numeric Bounds
// =============================================================================

#[test]
fn test_unit_interval_boundaries() {
    for field in ["confidence_score", "probability_approved"] {
        for ok in [0.0, 1.0] {
            let doc = with(prediction(), field, json!(ok));
            assert!(validate(RecordKind::LoanPrediction, &record(&doc)).is_ok(), "{} {}", field, ok);
        }
        for bad in [-0.0001, 1.0001] {
            let doc = with(prediction(), field, json!(bad));
            let err = validate(RecordKind::LoanPrediction, &record(&doc)).unwrap_err();
            assert!(err.has(ViolationKind::Range, field), "{} {}", field, bad);
        }
    }
}

#[test]
fn test_approval_rate_boundaries() {
    for ok in [0.0, 100.0] {
        let doc = with(analytics(), "approval_rate", json!(ok));
        assert!(validate(RecordKind::LoanAnalytics, &record(&doc)).is_ok());
    }
    for bad in [-0.01, 100.01] {
        let doc = with(analytics(), "approval_rate", json!(bad));
        let err = validate(RecordKind::LoanAnalytics, &record(&doc)).unwrap_err();
        assert!(err.has(ViolationKind::Range, "approval_rate"));
    }
}

#[test]
fn test_non_negative_boundaries() {
    let doc = with(scenario_application(), "applicant_income", json!(0.0));
    assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());

    let doc = with(scenario_application(), "coapplicant_income", json!(-1.0));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::Range, "coapplicant_income"));

    let doc = with(analytics(), "rejected_loans", json!(-1));
    let err = validate(RecordKind::LoanAnalytics, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::Range, "rejected_loans"));
}

#[test]
fn test_credit_history_is_binary() {
    for ok in [0, 1] {
        let doc = with(scenario_application(), "credit_history", json!(ok));
        assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());
    }
    let doc = with(scenario_application(), "credit_history", json!(2));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::Range, "credit_history"));
}

// =============================================================================
// Types and Nullability
// =============================================================================

#[test]
fn test_nullable_fields_accept_null() {
    let mut doc = scenario_application();
    for field in ["loan_amount", "loan_amount_term", "credit_history"] {
        doc[field] = Value::Null;
    }
    assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());
}

#[test]
fn test_null_in_non_nullable_field_is_type_mismatch() {
    let doc = with(scenario_application(), "applicant_income", Value::Null);
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::TypeMismatch, "applicant_income"));
    assert_eq!(err.count(ViolationKind::Range), 0);
}

#[test]
fn test_string_number_is_type_mismatch_only() {
    let doc = with(scenario_application(), "applicant_income", json!("5849"));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert_eq!(err.violations().len(), 1);
    assert!(err.has(ViolationKind::TypeMismatch, "applicant_income"));
}

#[test]
fn test_integer_accepted_for_real_but_not_reverse() {
    let doc = with(scenario_application(), "applicant_income", json!(5849));
    assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());

    let doc = with(scenario_application(), "loan_amount_term", json!(360.5));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::TypeMismatch, "loan_amount_term"));
}

#[test]
fn test_dates_must_be_dates() {
    let doc = with(scenario_application(), "created_at", json!("2024-01-01"));
    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::TypeMismatch, "created_at"));
}

#[test]
fn test_unknown_fields_tolerated() {
    let doc = with(scenario_application(), "risk_band", json!({ "score": 3 }));
    assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());

    let doc = with(scenario_application(), "is_verified", json!(true));
    let doc = with(doc, "tags", json!(["priority", 1, null]));
    assert!(validate(RecordKind::LoanApplication, &record(&doc)).is_ok());
}

#[test]
fn test_bool_on_declared_fields_aggregated() {
    let mut doc = scenario_application();
    doc["gender"] = json!("male");
    doc["married"] = json!(true);
    doc["applicant_income"] = json!(-1.0);
    doc["loan_amount"] = json!([100.0]);

    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert!(err.has(ViolationKind::InvalidEnumValue, "gender"));
    assert!(err.has(ViolationKind::InvalidEnumValue, "married"));
    assert!(err.has(ViolationKind::Range, "applicant_income"));
    assert!(err.has(ViolationKind::TypeMismatch, "loan_amount"));
    assert_eq!(err.violations().len(), 4);
}

// =============================================================================
// Aggregation and Determinism
// =============================================================================

#[test]
fn test_all_violations_aggregated_in_rule_order() {
    let mut doc = without(scenario_application(), &["loan_id"]);
    doc["gender"] = json!("male");
    doc["applicant_income"] = json!(-5.0);

    let err = validate(RecordKind::LoanApplication, &record(&doc)).unwrap_err();
    assert_eq!(
        err.codes(),
        vec!["LOAN_MISSING_FIELD", "LOAN_INVALID_ENUM_VALUE", "LOAN_RANGE_ERROR"]
    );
}

#[test]
fn test_validation_is_deterministic() {
    let doc = with(with(prediction(), "confidence_score", json!(2.0)), "predicted_status", json!("Pending"));
    let first = validate(RecordKind::LoanPrediction, &record(&doc)).unwrap_err();
    for _ in 0..100 {
        let again = validate(RecordKind::LoanPrediction, &record(&doc)).unwrap_err();
        assert_eq!(again.violations(), first.violations());
    }
}

// =============================================================================
// Analytics Totals
// =============================================================================

#[test]
fn test_analytics_totals_opt_in() {
    let doc = with(analytics(), "approved_loans", json!(500));
    let rec = record(&doc);

    assert!(validate(RecordKind::LoanAnalytics, &rec).is_ok());

    let strict = Validator::new(ValidatorOptions {
        enforce_analytics_totals: true,
    });
    let err = strict.validate(RecordKind::LoanAnalytics, &rec).unwrap_err();
    assert!(err.has(ViolationKind::CrossField, "approved_loans"));
    assert!(strict.validate(RecordKind::LoanAnalytics, &record(&analytics())).is_ok());
}

#[test]
fn test_admit_returns_record_unchanged() {
    let rec = record(&scenario_application());
    let admitted = Validator::default()
        .admit(RecordKind::LoanApplication, rec.clone())
        .unwrap();
    assert_eq!(admitted, rec);
    assert_eq!(
        admitted.get("loan_id"),
        Some(&FieldValue::String("LP001002".into()))
    );
}
