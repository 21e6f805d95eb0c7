//! Conversion between JSON documents and semantic field values
//!
//! Mapping:
//! - JSON string → string
//! - JSON integer → int (u64 beyond i64::MAX → real)
//! - JSON float → real
//! - `{"$date": "..."}` → date (RFC 3339 or `YYYY-MM-DD` at midnight UTC)
//! - any other JSON object → object
//! - bool → bool, array → array
//! - null → null

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Number, Value};

use super::types::{FieldValue, Record};

/// Extended-JSON key marking a date value
pub const DATE_KEY: &str = "$date";

/// Failure to convert a JSON document into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    /// Field path (e.g., "feature_importance.credit_history")
    pub path: String,
    pub reason: String,
}

impl ConversionError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "LOAN_CONVERSION_FAILED"
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: field '{}': {}", self.code(), self.path, self.reason)
    }
}

impl std::error::Error for ConversionError {}

/// Parses a date string: RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts a JSON object into a record.
pub fn record_from_json(document: &Value) -> Result<Record, ConversionError> {
    let obj = document
        .as_object()
        .ok_or_else(|| ConversionError::new("$root", format!("expected object, got {}", json_type_name(document))))?;
    object_from_json(obj, "")
}

/// Converts a record into a JSON object.
pub fn record_to_json(record: &Record) -> Value {
    Value::Object(
        record
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

fn object_from_json(
    obj: &Map<String, Value>,
    path_prefix: &str,
) -> Result<BTreeMap<String, FieldValue>, ConversionError> {
    obj.iter()
        .map(|(key, value)| {
            let path = make_path(path_prefix, key);
            value_from_json(value, &path).map(|v| (key.clone(), v))
        })
        .collect()
}

/// Converts a single JSON value.
pub fn value_from_json(value: &Value, path: &str) -> Result<FieldValue, ConversionError> {
    match value {
        Value::Null => Ok(FieldValue::Null),
        Value::String(s) => Ok(FieldValue::String(s.clone())),
        Value::Number(n) => Ok(number_from_json(n)),
        Value::Object(obj) => {
            if let Some(raw) = obj.get(DATE_KEY) {
                if obj.len() != 1 {
                    return Err(ConversionError::new(path, "date object must contain only '$date'"));
                }
                let text = raw
                    .as_str()
                    .ok_or_else(|| ConversionError::new(path, "'$date' must be a string"))?;
                return parse_date(text)
                    .map(FieldValue::Date)
                    .ok_or_else(|| ConversionError::new(path, format!("unparseable date '{}'", text)));
            }
            object_from_json(obj, path).map(FieldValue::Object)
        }
        Value::Bool(b) => Ok(FieldValue::Bool(*b)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| value_from_json(item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Array),
    }
}

fn number_from_json(n: &Number) -> FieldValue {
    if let Some(i) = n.as_i64() {
        FieldValue::Int(i)
    } else {
        // u64 beyond i64 range or a float; as_f64 is infallible for these
        FieldValue::Real(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Converts a single field value to JSON. Non-finite reals become null.
pub fn value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::String(s) => Value::String(s.clone()),
        FieldValue::Int(i) => Value::Number((*i).into()),
        FieldValue::Real(r) => Number::from_f64(*r).map_or(Value::Null, Value::Number),
        FieldValue::Date(d) => {
            let mut obj = Map::new();
            obj.insert(DATE_KEY.to_string(), Value::String(d.to_rfc3339()));
            Value::Object(obj)
        }
        FieldValue::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Array(items) => Value::Array(items.iter().map(value_to_json).collect()),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
