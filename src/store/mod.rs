//! Record store
//!
//! Write path per record:
//! 1. Validate against the kind's schema (all violations collected)
//! 2. Take the collection's write lock
//! 3. Check unique indexes
//! 4. Append the log line (fsync when configured)
//! 5. Update in-memory records and indexes
//!
//! Open replays every collection log, re-validating each record and
//! rebuilding indexes. Corruption anywhere fails the open.
//!
//! The store is an explicit handle: share `&Store` across threads.

mod checksum;
mod collection;
mod errors;
mod reader;
mod record;
mod writer;

pub use errors::{StoreError, StoreResult};
pub use record::{LogEntry, LogOp};
pub use writer::{log_path, COLLECTIONS_DIR};

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value;

use self::collection::Collection;
use self::reader::read_log;
use self::writer::LogWriter;
use crate::index::RecordId;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::schema::{
    record_from_json, FieldValue, Record, RecordKind, Validator, ValidatorOptions,
};

/// Store-wide switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub validator: ValidatorOptions,
    /// Sync every appended line to disk before acknowledging the write
    pub fsync: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            validator: ValidatorOptions::default(),
            fsync: true,
        }
    }
}

/// The loan record store: three collections behind individual locks
#[derive(Debug)]
pub struct Store {
    data_dir: Option<PathBuf>,
    validator: Validator,
    applications: RwLock<Collection>,
    predictions: RwLock<Collection>,
    analytics: RwLock<Collection>,
    metrics: MetricsRegistry,
}

impl Store {
    /// Opens (or creates) a store under `data_dir`, replaying every log.
    ///
    /// # Errors
    ///
    /// I/O failures, corrupted log lines and stored records that no longer
    /// validate all fail the open.
    pub fn open(data_dir: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();
        let dir_display = data_dir.display().to_string();
        let scope = ObservationScope::with_fields(
            Event::StoreOpen.as_str(),
            &[("data_dir", dir_display.as_str())],
        );

        let validator = Validator::new(options.validator);
        let metrics = MetricsRegistry::new();

        let open = |kind| open_collection(data_dir, kind, options.fsync, &validator, &metrics);
        let opened = (|| {
            Ok::<_, StoreError>((
                open(RecordKind::LoanApplication)?,
                open(RecordKind::LoanPrediction)?,
                open(RecordKind::LoanAnalytics)?,
            ))
        })();

        let (applications, predictions, analytics) = match opened {
            Ok(collections) => collections,
            Err(e) => {
                if !e.is_rejection() {
                    log_event_with_fields(
                        Event::StoreCorrupted,
                        &[("data_dir", dir_display.as_str()), ("code", e.code())],
                    );
                }
                scope.fail_fatal(&e.to_string());
                return Err(e);
            }
        };

        let store = Self {
            data_dir: Some(data_dir.to_path_buf()),
            validator,
            applications: RwLock::new(applications),
            predictions: RwLock::new(predictions),
            analytics: RwLock::new(analytics),
            metrics,
        };

        let total = store.total_len()?.to_string();
        scope.complete_with_fields(&[("records", total.as_str())]);
        Ok(store)
    }

    /// Creates an empty store that never touches disk.
    pub fn in_memory(options: StoreOptions) -> Self {
        Self {
            data_dir: None,
            validator: Validator::new(options.validator),
            applications: RwLock::new(Collection::new(RecordKind::LoanApplication, None)),
            predictions: RwLock::new(Collection::new(RecordKind::LoanPrediction, None)),
            analytics: RwLock::new(Collection::new(RecordKind::LoanAnalytics, None)),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Data directory, `None` for in-memory stores
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Validates and stores a record, returning its id.
    ///
    /// # Errors
    ///
    /// `Validation` with every violation, or `DuplicateKey` when a unique
    /// index already holds the key. Neither leaves any trace in the store.
    pub fn insert(&self, kind: RecordKind, record: Record) -> StoreResult<RecordId> {
        let record = self.admit(kind, record)?;

        let mut coll = self.write(kind)?;
        let id = coll
            .insert(record)
            .map_err(|e| self.note_write_failure(kind, e))?;
        drop(coll);

        self.metrics.increment_stored();
        let id_str = id.to_string();
        log_event_with_fields(
            Event::RecordInserted,
            &[("collection", kind.collection()), ("id", id_str.as_str())],
        );
        Ok(id)
    }

    /// Converts a JSON document and inserts it.
    pub fn insert_json(&self, kind: RecordKind, document: &Value) -> StoreResult<RecordId> {
        let record = record_from_json(document).map_err(|e| {
            self.metrics.increment_rejected();
            let err = StoreError::from(e);
            self.log_rejection(kind, &err);
            err
        })?;
        self.insert(kind, record)
    }

    /// Replaces the application with the given `loan_id`.
    ///
    /// `loan_id` may be omitted from `record` but never changed.
    /// `updated_at` is stamped with the current time when absent or null.
    pub fn update_application(&self, loan_id: &str, mut record: Record) -> StoreResult<RecordId> {
        let kind = RecordKind::LoanApplication;
        let key = FieldValue::String(loan_id.to_string());

        match record.get("loan_id") {
            None => {
                record.insert("loan_id".to_string(), key.clone());
            }
            Some(attempted) if *attempted != key => {
                let err = StoreError::ImmutableKey {
                    field: "loan_id",
                    existing: loan_id.to_string(),
                    attempted: attempted.to_string(),
                };
                self.log_rejection(kind, &err);
                return Err(err);
            }
            Some(_) => {}
        }

        if record.get("updated_at").map_or(true, FieldValue::is_null) {
            record.insert("updated_at".to_string(), FieldValue::Date(Utc::now()));
        }

        let record = self.admit(kind, record)?;

        let mut coll = self.write(kind)?;
        let Some(id) = coll.find_eq("loan_id", &key)?.first().map(|(id, _)| *id) else {
            drop(coll);
            let err = StoreError::NotFound {
                collection: kind.collection(),
                field: "loan_id",
                key: loan_id.to_string(),
            };
            self.log_rejection(kind, &err);
            return Err(err);
        };
        coll.replace(id, record)
            .map_err(|e| self.note_write_failure(kind, e))?;
        drop(coll);

        self.metrics.increment_stored();
        let id_str = id.to_string();
        log_event_with_fields(
            Event::RecordUpdated,
            &[("collection", kind.collection()), ("loan_id", loan_id), ("id", id_str.as_str())],
        );
        Ok(id)
    }

    /// Record by id
    pub fn get(&self, kind: RecordKind, id: RecordId) -> StoreResult<Option<Record>> {
        Ok(self.read(kind)?.get(id).cloned())
    }

    /// Records whose indexed `field` equals `value`, ascending by id.
    pub fn find_eq(
        &self,
        kind: RecordKind,
        field: &str,
        value: &FieldValue,
    ) -> StoreResult<Vec<(RecordId, Record)>> {
        self.read(kind)?.find_eq(field, value)
    }

    /// Records whose indexed `field` lies in `[min, max]`; `None` is unbounded.
    pub fn find_range(
        &self,
        kind: RecordKind,
        field: &str,
        min: Option<&FieldValue>,
        max: Option<&FieldValue>,
    ) -> StoreResult<Vec<(RecordId, Record)>> {
        self.read(kind)?.find_range(field, min, max)
    }

    /// Number of records in a collection
    pub fn len(&self, kind: RecordKind) -> StoreResult<usize> {
        Ok(self.read(kind)?.len())
    }

    /// Whether every collection is empty
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.total_len()? == 0)
    }

    /// All records of a collection, ascending by id
    pub fn records(&self, kind: RecordKind) -> StoreResult<Vec<(RecordId, Record)>> {
        Ok(self
            .read(kind)?
            .records()
            .map(|(id, r)| (*id, r.clone()))
            .collect())
    }

    /// Distinct keys per declared index of a collection
    pub fn index_key_counts(&self, kind: RecordKind) -> StoreResult<Vec<(&'static str, usize)>> {
        let coll = self.read(kind)?;
        let indexes = coll.indexes();
        Ok(indexes
            .specs()
            .iter()
            .map(|spec| (spec.field, indexes.key_count(spec.field).unwrap_or(0)))
            .collect())
    }

    fn total_len(&self) -> StoreResult<usize> {
        RecordKind::ALL
            .iter()
            .try_fold(0, |acc, &kind| Ok(acc + self.len(kind)?))
    }

    fn admit(&self, kind: RecordKind, record: Record) -> StoreResult<Record> {
        self.metrics.increment_validated();
        self.validator.admit(kind, record).map_err(|e| {
            self.metrics.increment_rejected();
            let err = StoreError::from(e);
            self.log_rejection(kind, &err);
            err
        })
    }

    fn note_write_failure(&self, kind: RecordKind, err: StoreError) -> StoreError {
        if let StoreError::DuplicateKey(dup) = &err {
            self.metrics.increment_duplicate_keys();
            log_event_with_fields(
                Event::DuplicateKey,
                &[
                    ("collection", dup.collection),
                    ("field", dup.field),
                    ("key", dup.key.as_str()),
                ],
            );
        } else if err.is_rejection() {
            self.log_rejection(kind, &err);
        }
        err
    }

    fn log_rejection(&self, kind: RecordKind, err: &StoreError) {
        let codes = err.detail_codes().join(",");
        log_event_with_fields(
            Event::RecordRejected,
            &[("collection", kind.collection()), ("codes", codes.as_str())],
        );
    }

    fn collection(&self, kind: RecordKind) -> &RwLock<Collection> {
        match kind {
            RecordKind::LoanApplication => &self.applications,
            RecordKind::LoanPrediction => &self.predictions,
            RecordKind::LoanAnalytics => &self.analytics,
        }
    }

    fn read(&self, kind: RecordKind) -> StoreResult<RwLockReadGuard<'_, Collection>> {
        self.collection(kind)
            .read()
            .map_err(|_| StoreError::LockPoisoned(kind.collection()))
    }

    fn write(&self, kind: RecordKind) -> StoreResult<RwLockWriteGuard<'_, Collection>> {
        self.collection(kind)
            .write()
            .map_err(|_| StoreError::LockPoisoned(kind.collection()))
    }
}

fn open_collection(
    data_dir: &Path,
    kind: RecordKind,
    fsync: bool,
    validator: &Validator,
    metrics: &MetricsRegistry,
) -> StoreResult<Collection> {
    let path = log_path(data_dir, kind);
    let entries = read_log(&path)?;
    let lines = entries.len();

    let writer = LogWriter::open(&path, fsync)?;
    let mut coll = Collection::new(kind, Some(writer));
    coll.replay(&path, entries, validator)?;
    metrics.add_validated(lines as u64);

    let lines_str = lines.to_string();
    let records_str = coll.len().to_string();
    log_event_with_fields(
        Event::StoreReplayed,
        &[
            ("collection", coll.kind().collection()),
            ("lines", lines_str.as_str()),
            ("records", records_str.as_str()),
        ],
    );
    Ok(coll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn application(loan_id: &str) -> Value {
        json!({
            "loan_id": loan_id,
            "gender": "Female",
            "married": "No",
            "dependents": "0",
            "education": "Graduate",
            "self_employed": "No",
            "applicant_income": 4000.0,
            "coapplicant_income": 0.0,
            "loan_amount": 100.0,
            "loan_amount_term": 360,
            "credit_history": 1,
            "property_area": "Urban",
            "loan_status": "N",
            "created_at": { "$date": "2024-02-01" },
            "updated_at": { "$date": "2024-02-01" },
        })
    }

    #[test]
    fn test_in_memory_insert_and_get() {
        let store = Store::in_memory(StoreOptions::default());
        let id = store
            .insert_json(RecordKind::LoanApplication, &application("LP009001"))
            .unwrap();

        let record = store.get(RecordKind::LoanApplication, id).unwrap().unwrap();
        assert_eq!(record.get("loan_id").and_then(FieldValue::as_str), Some("LP009001"));
        assert_eq!(record.get("loan_status").and_then(FieldValue::as_str), Some("N"));
        assert!(store.data_dir().is_none());
        assert_eq!(store.metrics().snapshot().records_stored, 1);
    }

    #[test]
    fn test_rejected_record_counts() {
        let store = Store::in_memory(StoreOptions::default());
        let mut doc = application("LP009002");
        doc["gender"] = json!("Other");

        let err = store.insert_json(RecordKind::LoanApplication, &doc).unwrap_err();
        assert_eq!(err.code(), "LOAN_VALIDATION_FAILED");
        assert_eq!(store.len(RecordKind::LoanApplication).unwrap(), 0);

        let snapshot = store.metrics().snapshot();
        assert_eq!(snapshot.records_validated, 1);
        assert_eq!(snapshot.records_rejected, 1);
        assert_eq!(snapshot.records_stored, 0);
    }

    #[test]
    fn test_reopen_replays_records() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = Store::open(temp_dir.path(), StoreOptions::default()).unwrap();
            store
                .insert_json(RecordKind::LoanApplication, &application("LP009003"))
                .unwrap();
        }

        let store = Store::open(temp_dir.path(), StoreOptions::default()).unwrap();
        assert_eq!(store.len(RecordKind::LoanApplication).unwrap(), 1);
        assert_eq!(store.len(RecordKind::LoanPrediction).unwrap(), 0);
        assert!(log_path(temp_dir.path(), RecordKind::LoanAnalytics).exists());
    }

    #[test]
    fn test_update_stamps_updated_at() {
        let store = Store::in_memory(StoreOptions::default());
        store
            .insert_json(RecordKind::LoanApplication, &application("LP009004"))
            .unwrap();

        let mut doc = application("LP009004");
        doc.as_object_mut().unwrap().remove("updated_at");
        doc.as_object_mut().unwrap().remove("loan_id");
        doc["loan_status"] = json!("Y");
        let record = record_from_json(&doc).unwrap();

        let id = store.update_application("LP009004", record).unwrap();
        let stored = store.get(RecordKind::LoanApplication, id).unwrap().unwrap();
        assert_eq!(stored.get("loan_status").and_then(FieldValue::as_str), Some("Y"));
        let stamped = stored.get("updated_at").and_then(FieldValue::as_date).unwrap();
        assert!(stamped.date_naive() > chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(store.len(RecordKind::LoanApplication).unwrap(), 1);
    }
}
