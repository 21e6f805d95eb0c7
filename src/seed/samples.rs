//! Bootstrap rows loaded by `loandb seed`

use serde_json::{json, Value};

use crate::schema::RecordKind;

/// The bootstrap documents, in load order.
///
/// Three applications, two predictions and one analytics snapshot.
pub fn sample_records() -> Vec<(RecordKind, Value)> {
    let mut rows = Vec::with_capacity(6);
    rows.extend(
        sample_applications()
            .into_iter()
            .map(|doc| (RecordKind::LoanApplication, doc)),
    );
    rows.extend(
        sample_predictions()
            .into_iter()
            .map(|doc| (RecordKind::LoanPrediction, doc)),
    );
    rows.push((RecordKind::LoanAnalytics, sample_analytics()));
    rows
}

#[allow(clippy::too_many_arguments)]
fn application(
    loan_id: &str,
    married: &str,
    dependents: &str,
    self_employed: &str,
    incomes: (f64, f64),
    loan_amount: f64,
    property_area: &str,
    loan_status: &str,
    date: &str,
) -> Value {
    json!({
        "loan_id": loan_id,
        "gender": "Male",
        "married": married,
        "dependents": dependents,
        "education": "Graduate",
        "self_employed": self_employed,
        "applicant_income": incomes.0,
        "coapplicant_income": incomes.1,
        "loan_amount": loan_amount,
        "loan_amount_term": 360,
        "credit_history": 1,
        "property_area": property_area,
        "loan_status": loan_status,
        "created_at": { "$date": date },
        "updated_at": { "$date": date },
    })
}

fn sample_applications() -> Vec<Value> {
    vec![
        application(
            "LP001002",
            "No",
            "0",
            "No",
            (5849.0, 0.0),
            141.0,
            "Urban",
            "Y",
            "2024-01-01",
        ),
        application(
            "LP001003",
            "Yes",
            "1",
            "No",
            (4583.0, 1508.0),
            128.0,
            "Rural",
            "N",
            "2024-01-02",
        ),
        application(
            "LP001005",
            "Yes",
            "0",
            "Yes",
            (3000.0, 0.0),
            66.0,
            "Urban",
            "Y",
            "2024-01-03",
        ),
    ]
}

fn sample_predictions() -> Vec<Value> {
    vec![
        json!({
            "loan_id": "LP001002",
            "predicted_status": "Approved",
            "confidence_score": 0.85,
            "probability_approved": 0.85,
            "model_version": "v1.0",
            "feature_importance": {
                "credit_history": 0.25,
                "applicant_income": 0.20,
                "education": 0.15,
                "property_area": 0.10,
                "married": 0.10,
                "dependents": 0.08,
                "self_employed": 0.07,
                "loan_amount": 0.05,
            },
            "prediction_created_at": { "$date": "2024-01-01T10:00:00Z" },
        }),
        json!({
            "loan_id": "LP001003",
            "predicted_status": "Rejected",
            "confidence_score": 0.78,
            "probability_approved": 0.22,
            "model_version": "v1.0",
            "feature_importance": {
                "credit_history": 0.30,
                "applicant_income": 0.18,
                "education": 0.12,
                "property_area": 0.12,
                "married": 0.10,
                "dependents": 0.08,
                "self_employed": 0.05,
                "loan_amount": 0.05,
            },
            "prediction_created_at": { "$date": "2024-01-02T10:00:00Z" },
        }),
    ]
}

fn sample_analytics() -> Value {
    json!({
        "analysis_date": { "$date": "2024-01-01" },
        "total_applications": 614,
        "approved_loans": 422,
        "rejected_loans": 192,
        "approval_rate": 68.73,
        "avg_applicant_income": 5403.46,
        "avg_loan_amount": 146.41,
        "gender_distribution": { "Male": 489, "Female": 112, "Unknown": 13 },
        "education_distribution": { "Graduate": 480, "Not Graduate": 134 },
        "property_area_distribution": { "Urban": 202, "Semiurban": 207, "Rural": 205 },
        "income_ranges": {
            "0-3000": 245,
            "3001-6000": 234,
            "6001-10000": 89,
            "10000+": 46,
        },
        "analytics_created_at": { "$date": "2024-01-01T23:59:59Z" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{record_from_json, Validator, ValidatorOptions};

    #[test]
    fn test_sample_counts() {
        let rows = sample_records();
        let count = |kind| rows.iter().filter(|(k, _)| *k == kind).count();
        assert_eq!(count(RecordKind::LoanApplication), 3);
        assert_eq!(count(RecordKind::LoanPrediction), 2);
        assert_eq!(count(RecordKind::LoanAnalytics), 1);
    }

    #[test]
    fn test_samples_validate_with_totals_enforced() {
        let validator = Validator::new(ValidatorOptions {
            enforce_analytics_totals: true,
        });
        for (kind, doc) in sample_records() {
            let record = record_from_json(&doc).unwrap();
            assert!(validator.validate(kind, &record).is_ok(), "{} sample rejected", kind);
        }
    }
}
