//! One collection: records, indexes and the append log
//!
//! The caller holds the collection's write lock for the whole of
//! `insert`/`replace`, so the unique check, the append and the index update
//! are one step for concurrent writers.

use std::collections::BTreeMap;
use std::path::Path;

use super::errors::{StoreError, StoreResult};
use super::record::{LogEntry, LogOp};
use super::writer::LogWriter;
use crate::index::{IndexManager, RecordId};
use crate::schema::{record_from_json, record_to_json, FieldValue, Record, RecordKind, Validator};

#[derive(Debug)]
pub(crate) struct Collection {
    kind: RecordKind,
    records: BTreeMap<RecordId, Record>,
    indexes: IndexManager,
    next_id: RecordId,
    /// `None` for in-memory stores
    log: Option<LogWriter>,
}

impl Collection {
    pub(crate) fn new(kind: RecordKind, log: Option<LogWriter>) -> Self {
        Self {
            kind,
            records: BTreeMap::new(),
            indexes: IndexManager::new(kind),
            next_id: 1,
            log,
        }
    }

    pub(crate) fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Rebuilds records and indexes from decoded log entries.
    ///
    /// Every stored record is re-validated. A record that no longer
    /// validates, fails conversion or collides on a unique key fails the
    /// replay.
    pub(crate) fn replay(
        &mut self,
        path: &Path,
        entries: Vec<(usize, LogEntry)>,
        validator: &Validator,
    ) -> StoreResult<()> {
        for (line, entry) in entries {
            let record = record_from_json(&entry.record).map_err(|e| StoreError::Corrupted {
                path: path.to_path_buf(),
                line,
                reason: e.to_string(),
            })?;

            validator
                .validate(self.kind, &record)
                .map_err(|source| StoreError::InvalidStoredRecord {
                    path: path.to_path_buf(),
                    line,
                    source,
                })?;

            if entry.op == LogOp::Update && !self.records.contains_key(&entry.id) {
                return Err(StoreError::Corrupted {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("update of unknown record {}", entry.id),
                });
            }

            self.indexes
                .check_unique(&record, Some(entry.id))
                .map_err(|e| StoreError::Corrupted {
                    path: path.to_path_buf(),
                    line,
                    reason: e.to_string(),
                })?;

            self.apply(entry.id, record);
            self.next_id = self.next_id.max(entry.id + 1);
        }
        Ok(())
    }

    /// Stores a validated record under a fresh id.
    pub(crate) fn insert(&mut self, record: Record) -> StoreResult<RecordId> {
        self.indexes.check_unique(&record, None)?;

        let id = self.next_id;
        self.append(id, LogOp::Insert, &record)?;
        self.apply(id, record);
        self.next_id += 1;
        Ok(id)
    }

    /// Replaces an existing record with a validated one.
    pub(crate) fn replace(&mut self, id: RecordId, record: Record) -> StoreResult<()> {
        self.indexes.check_unique(&record, Some(id))?;
        self.append(id, LogOp::Update, &record)?;
        self.apply(id, record);
        Ok(())
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Records whose indexed field equals `value`, ascending by id.
    pub(crate) fn find_eq(
        &self,
        field: &str,
        value: &FieldValue,
    ) -> StoreResult<Vec<(RecordId, Record)>> {
        let ids = self.indexes.lookup_eq(field, value)?;
        Ok(self.collect(ids))
    }

    /// Records whose indexed field lies in `[min, max]`, ascending by id.
    pub(crate) fn find_range(
        &self,
        field: &str,
        min: Option<&FieldValue>,
        max: Option<&FieldValue>,
    ) -> StoreResult<Vec<(RecordId, Record)>> {
        let ids = self.indexes.lookup_range(field, min, max)?;
        Ok(self.collect(ids))
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = (&RecordId, &Record)> {
        self.records.iter()
    }

    pub(crate) fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    fn append(&mut self, id: RecordId, op: LogOp, record: &Record) -> StoreResult<()> {
        if let Some(log) = self.log.as_mut() {
            log.append(&LogEntry::new(id, op, record_to_json(record)))?;
        }
        Ok(())
    }

    fn apply(&mut self, id: RecordId, record: Record) {
        match self.records.get(&id) {
            Some(old) => self.indexes.apply_replace(id, old, &record),
            None => self.indexes.apply_write(id, &record),
        }
        self.records.insert(id, record);
    }

    fn collect(&self, mut ids: Vec<RecordId>) -> Vec<(RecordId, Record)> {
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.records.get(&id).map(|r| (id, r.clone())))
            .collect()
    }
}
