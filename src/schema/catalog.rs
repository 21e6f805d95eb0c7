//! Static schema catalog for the three loan record kinds
//!
//! Each kind is a rule table: field name to constraints, evaluated in
//! declaration order. Index declarations live beside the rules; the unique
//! ones (`loan_id`, `analysis_date`) are enforced by the storage layer.

use super::types::{Constraint, FieldRule, IndexSpec, RecordKind, RecordSchema, ValueKind};

const GENDER: &[&str] = &["Male", "Female"];
const YES_NO: &[&str] = &["Yes", "No"];
const DEPENDENTS: &[&str] = &["0", "1", "2", "3+"];
const EDUCATION: &[&str] = &["Graduate", "Not Graduate"];
const PROPERTY_AREA: &[&str] = &["Urban", "Semiurban", "Rural"];
const LOAN_STATUS: &[&str] = &["Y", "N"];
const PREDICTED_STATUS: &[&str] = &["Approved", "Rejected"];

const REQUIRED: Constraint = Constraint::Required;

const fn of(kind: ValueKind) -> Constraint {
    Constraint::Type {
        kind,
        nullable: false,
    }
}

const fn nullable(kind: ValueKind) -> Constraint {
    Constraint::Type {
        kind,
        nullable: true,
    }
}

const fn range(min: f64, max: Option<f64>, nullable: bool) -> Constraint {
    Constraint::Range { min, max, nullable }
}

// Rule slices below only reference these items so the tables stay
// promotable to 'static.
const STRING: Constraint = of(ValueKind::String);
const INT: Constraint = of(ValueKind::Int);
const REAL: Constraint = of(ValueKind::Real);
const DATE: Constraint = of(ValueKind::Date);
const OBJECT: Constraint = of(ValueKind::Object);
const NULLABLE_INT: Constraint = nullable(ValueKind::Int);
const NULLABLE_REAL: Constraint = nullable(ValueKind::Real);

const NON_NEGATIVE: Constraint = range(0.0, None, false);
const UNIT_INTERVAL: Constraint = range(0.0, Some(1.0), false);
const PERCENT: Constraint = range(0.0, Some(100.0), false);
const NULLABLE_NON_NEGATIVE: Constraint = range(0.0, None, true);
const NULLABLE_BINARY: Constraint = range(0.0, Some(1.0), true);

static LOAN_APPLICATION_RULES: &[FieldRule] = &[
    FieldRule::new("loan_id", &[REQUIRED, STRING]),
    FieldRule::new("gender", &[REQUIRED, Constraint::Enum(GENDER)]),
    FieldRule::new("married", &[REQUIRED, Constraint::Enum(YES_NO)]),
    FieldRule::new("dependents", &[REQUIRED, Constraint::Enum(DEPENDENTS)]),
    FieldRule::new("education", &[REQUIRED, Constraint::Enum(EDUCATION)]),
    FieldRule::new("self_employed", &[REQUIRED, Constraint::Enum(YES_NO)]),
    FieldRule::new("applicant_income", &[REQUIRED, REAL, NON_NEGATIVE]),
    FieldRule::new("coapplicant_income", &[REQUIRED, REAL, NON_NEGATIVE]),
    FieldRule::new("loan_amount", &[NULLABLE_REAL, NULLABLE_NON_NEGATIVE]),
    FieldRule::new("loan_amount_term", &[NULLABLE_INT, NULLABLE_NON_NEGATIVE]),
    FieldRule::new("credit_history", &[NULLABLE_INT, NULLABLE_BINARY]),
    FieldRule::new("property_area", &[REQUIRED, Constraint::Enum(PROPERTY_AREA)]),
    FieldRule::new("loan_status", &[REQUIRED, Constraint::Enum(LOAN_STATUS)]),
    FieldRule::new("created_at", &[DATE]),
    FieldRule::new("updated_at", &[DATE]),
];

static LOAN_APPLICATION_INDEXES: &[IndexSpec] = &[
    IndexSpec::unique("loan_id"),
    IndexSpec::non_unique("loan_status"),
    IndexSpec::non_unique("gender"),
    IndexSpec::non_unique("education"),
    IndexSpec::non_unique("property_area"),
    IndexSpec::non_unique("created_at"),
];

static LOAN_PREDICTION_RULES: &[FieldRule] = &[
    FieldRule::new("loan_id", &[REQUIRED, STRING]),
    FieldRule::new("predicted_status", &[REQUIRED, Constraint::Enum(PREDICTED_STATUS)]),
    FieldRule::new("confidence_score", &[REQUIRED, REAL, UNIT_INTERVAL]),
    FieldRule::new("probability_approved", &[REQUIRED, REAL, UNIT_INTERVAL]),
    FieldRule::new("model_version", &[REQUIRED, STRING]),
    FieldRule::new("feature_importance", &[OBJECT]),
    FieldRule::new("prediction_created_at", &[DATE]),
];

// A loan accumulates one prediction per model run, so loan_id is not unique here.
static LOAN_PREDICTION_INDEXES: &[IndexSpec] = &[
    IndexSpec::non_unique("loan_id"),
    IndexSpec::non_unique("predicted_status"),
    IndexSpec::non_unique("confidence_score"),
    IndexSpec::non_unique("prediction_created_at"),
];

static LOAN_ANALYTICS_RULES: &[FieldRule] = &[
    FieldRule::new("analysis_date", &[REQUIRED, DATE]),
    FieldRule::new("total_applications", &[REQUIRED, INT, NON_NEGATIVE]),
    FieldRule::new("approved_loans", &[REQUIRED, INT, NON_NEGATIVE]),
    FieldRule::new("rejected_loans", &[REQUIRED, INT, NON_NEGATIVE]),
    FieldRule::new("approval_rate", &[REQUIRED, REAL, PERCENT]),
    FieldRule::new("avg_applicant_income", &[REAL, NON_NEGATIVE]),
    FieldRule::new("avg_loan_amount", &[REAL, NON_NEGATIVE]),
    FieldRule::new("gender_distribution", &[OBJECT]),
    FieldRule::new("education_distribution", &[OBJECT]),
    FieldRule::new("property_area_distribution", &[OBJECT]),
    FieldRule::new("income_ranges", &[OBJECT]),
    FieldRule::new("analytics_created_at", &[DATE]),
];

static LOAN_ANALYTICS_INDEXES: &[IndexSpec] = &[
    IndexSpec::unique("analysis_date"),
    IndexSpec::non_unique("approval_rate"),
];

static LOAN_APPLICATION: RecordSchema = RecordSchema {
    kind: RecordKind::LoanApplication,
    rules: LOAN_APPLICATION_RULES,
    indexes: LOAN_APPLICATION_INDEXES,
};

static LOAN_PREDICTION: RecordSchema = RecordSchema {
    kind: RecordKind::LoanPrediction,
    rules: LOAN_PREDICTION_RULES,
    indexes: LOAN_PREDICTION_INDEXES,
};

static LOAN_ANALYTICS: RecordSchema = RecordSchema {
    kind: RecordKind::LoanAnalytics,
    rules: LOAN_ANALYTICS_RULES,
    indexes: LOAN_ANALYTICS_INDEXES,
};

/// Returns the schema for a record kind.
pub fn schema_for(kind: RecordKind) -> &'static RecordSchema {
    match kind {
        RecordKind::LoanApplication => &LOAN_APPLICATION,
        RecordKind::LoanPrediction => &LOAN_PREDICTION,
        RecordKind::LoanAnalytics => &LOAN_ANALYTICS,
    }
}

impl RecordKind {
    /// Shorthand for [`schema_for`]
    pub fn schema(&self) -> &'static RecordSchema {
        schema_for(*self)
    }
}
