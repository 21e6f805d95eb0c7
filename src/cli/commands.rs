//! CLI command implementations
//!
//! Each command loads its configuration, opens what it needs, writes one
//! JSON response line to stdout and returns.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{record_from_json, schema_for, RecordKind, Validator, Violation};
use crate::seed::{import_jsonl, load_samples};
use crate::store::{Store, COLLECTIONS_DIR};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_rejection, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Validate { kind, config } => validate(kind, config.as_deref()),
        Command::Seed { config } => seed(&config),
        Command::Import { config, kind, file } => import(&config, kind, &file),
        Command::Indexes => indexes(),
        Command::Stats { config } => stats(&config),
    }
}

/// Create the data directory layout and empty collection logs
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir.join(COLLECTIONS_DIR)).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;
    Store::open(data_dir, config.store_options())?;

    log_event_with_fields(Event::DataDirInitialized, &[("data_dir", config.data_dir.as_str())]);
    write_response(json!({ "initialized": true, "data_dir": config.data_dir }))
}

/// Validate one record from stdin without storing it
pub fn validate(kind: RecordKind, config_path: Option<&Path>) -> CliResult<()> {
    let validator = match config_path {
        Some(path) => Validator::new(Config::load(path)?.validator_options()),
        None => Validator::default(),
    };

    let document = read_request()?;
    match check_document(&validator, kind, &document) {
        Ok(()) => write_response(json!({ "kind": kind.name(), "valid": true })),
        Err((code, violations)) => {
            let count = violations.as_array().map_or(0, Vec::len);
            write_rejection(code, violations)?;
            Err(CliError::record_rejected(format!(
                "{} record rejected with {} violation(s)",
                kind.name(),
                count
            )))
        }
    }
}

/// Load the bootstrap rows
pub fn seed(config_path: &Path) -> CliResult<()> {
    let store = open_store(config_path)?;
    let report = load_samples(&store)?;
    write_response(serde_json::to_value(&report)?)
}

/// Import a JSON-lines file into one collection
pub fn import(config_path: &Path, kind: RecordKind, file: &Path) -> CliResult<()> {
    let store = open_store(config_path)?;
    let input = File::open(file)
        .map_err(|e| CliError::io_error(format!("Failed to open {:?}: {}", file, e)))?;

    let report = import_jsonl(&store, kind, BufReader::new(input))?;
    write_response(serde_json::to_value(&report)?)
}

/// Print index declarations for every collection
pub fn indexes() -> CliResult<()> {
    write_response(index_declarations())
}

/// Print record counts and index sizes per collection
pub fn stats(config_path: &Path) -> CliResult<()> {
    let store = open_store(config_path)?;
    write_response(store_stats(&store)?)
}

fn open_store(config_path: &Path) -> CliResult<Store> {
    let config = Config::load(config_path)?;
    if !is_initialized(config.data_path()) {
        return Err(CliError::not_initialized());
    }
    Ok(Store::open(config.data_path(), config.store_options())?)
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(COLLECTIONS_DIR).is_dir()
}

/// Validates a document; on failure returns the code and violation list.
fn check_document(
    validator: &Validator,
    kind: RecordKind,
    document: &Value,
) -> Result<(), (&'static str, Value)> {
    let record = record_from_json(document).map_err(|e| {
        (
            e.code(),
            json!([{ "code": e.code(), "field": e.path, "message": e.to_string() }]),
        )
    })?;

    validator
        .validate(kind, &record)
        .map_err(|e| (e.code(), violations_json(e.violations())))
}

fn violations_json(violations: &[Violation]) -> Value {
    violations
        .iter()
        .map(|v| {
            json!({
                "error": v.kind.error_name(),
                "code": v.kind.code(),
                "field": v.field,
                "expected": v.expected,
                "actual": v.actual,
            })
        })
        .collect()
}

fn index_declarations() -> Value {
    RecordKind::ALL
        .iter()
        .map(|&kind| {
            let indexes: Vec<Value> = schema_for(kind)
                .indexes
                .iter()
                .map(|spec| json!({ "field": spec.field, "unique": spec.unique }))
                .collect();
            json!({ "collection": kind.collection(), "indexes": indexes })
        })
        .collect()
}

fn store_stats(store: &Store) -> CliResult<Value> {
    let mut collections = Vec::with_capacity(RecordKind::ALL.len());
    for kind in RecordKind::ALL {
        let keys: serde_json::Map<String, Value> = store
            .index_key_counts(kind)?
            .into_iter()
            .map(|(field, count)| (field.to_string(), json!(count)))
            .collect();
        collections.push(json!({
            "collection": kind.collection(),
            "records": store.len(kind)?,
            "index_keys": keys,
        }));
    }

    Ok(json!({
        "collections": collections,
        "metrics": serde_json::to_value(store.metrics().snapshot())?,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::store::{log_path, StoreOptions};
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("loandb.json");
        let data_dir = temp_dir.path().join("data");

        let config = json!({
            "data_dir": data_dir.to_string_lossy(),
            "fsync": false,
            "log_level": "error",
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_init_creates_collection_logs() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        let data_dir = temp_dir.path().join("data");

        init(&config_path).unwrap();

        for kind in RecordKind::ALL {
            assert!(log_path(&data_dir, kind).exists());
        }
    }

    #[test]
    fn test_init_refuses_reinit() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(&config_path).unwrap();
        let err = init(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_seed_requires_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let err = seed(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_seed_then_stats() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(&config_path).unwrap();
        seed(&config_path).unwrap();

        let store = open_store(&config_path).unwrap();
        let stats = store_stats(&store).unwrap();
        assert_eq!(stats["collections"][0]["records"], 3);
        assert_eq!(stats["collections"][1]["records"], 2);
        assert_eq!(stats["collections"][2]["records"], 1);
        assert_eq!(stats["collections"][0]["index_keys"]["loan_id"], 3);
    }

    #[test]
    fn test_import_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        init(&config_path).unwrap();

        let err = import(
            &config_path,
            RecordKind::LoanAnalytics,
            &temp_dir.path().join("absent.jsonl"),
        )
        .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }

    #[test]
    fn test_check_document_lists_violations() {
        let document = json!({
            "loan_id": "LP002001",
            "predicted_status": "Maybe",
            "confidence_score": 1.5,
            "probability_approved": 0.4,
            "model_version": "v2.0",
            "prediction_created_at": { "$date": "2024-05-01T08:00:00Z" },
        });

        let (code, violations) =
            check_document(&Validator::default(), RecordKind::LoanPrediction, &document).unwrap_err();
        assert_eq!(code, "LOAN_VALIDATION_FAILED");

        let codes: Vec<&str> = violations
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["LOAN_INVALID_ENUM_VALUE", "LOAN_RANGE_ERROR"]);
    }

    #[test]
    fn test_check_document_conversion_failure() {
        let document = json!({ "loan_id": "LP002001", "created_at": { "$date": "last week" } });
        let (code, violations) =
            check_document(&Validator::default(), RecordKind::LoanApplication, &document).unwrap_err();
        assert_eq!(code, "LOAN_CONVERSION_FAILED");
        assert_eq!(violations[0]["field"], "created_at");
    }

    #[test]
    fn test_index_declarations() {
        let decls = index_declarations();
        assert_eq!(decls[0]["collection"], "loan_applications");
        assert_eq!(decls[0]["indexes"][0], json!({ "field": "loan_id", "unique": true }));
        assert_eq!(decls[2]["indexes"][0]["field"], "analysis_date");
    }

    #[test]
    fn test_stats_on_in_memory_store() {
        let store = Store::in_memory(StoreOptions::default());
        let stats = store_stats(&store).unwrap();
        assert_eq!(stats["metrics"]["records_stored"], 0);
    }
}
