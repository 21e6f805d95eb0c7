//! Index Manager for one collection
//!
//! # API
//!
//! - `check_unique(record, except)` - Unique-key conflict check before a write
//! - `apply_write(id, record)` - Update indexes after a storage write
//! - `apply_replace(id, old, new)` - Update indexes after an update
//! - `lookup_eq(field, value)` - Exact match lookup
//! - `lookup_range(field, min, max)` - Range lookup

use std::collections::BTreeMap;

use super::btree::{IndexKey, IndexTree, RecordId};
use super::errors::{IndexError, IndexResult};
use crate::schema::{DuplicateKeyError, FieldValue, IndexSpec, Record, RecordKind};

/// Index Manager that maintains the declared indexes of one collection
#[derive(Debug)]
pub struct IndexManager {
    kind: RecordKind,

    /// Declared indexes by field, in declaration order of `specs`
    trees: BTreeMap<&'static str, IndexTree>,

    specs: &'static [IndexSpec],
}

impl IndexManager {
    /// Creates empty indexes for every declaration of the kind's schema
    pub fn new(kind: RecordKind) -> Self {
        let specs = kind.schema().indexes;
        let trees = specs
            .iter()
            .map(|spec| (spec.field, IndexTree::new()))
            .collect();

        Self { kind, trees, specs }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Index declarations, in catalog order
    pub fn specs(&self) -> &'static [IndexSpec] {
        self.specs
    }

    /// Checks every unique index for a conflicting record.
    ///
    /// `except` excludes the record being replaced by an update.
    /// Reports the first conflict in declaration order.
    pub fn check_unique(
        &self,
        record: &Record,
        except: Option<RecordId>,
    ) -> Result<(), DuplicateKeyError> {
        for spec in self.specs.iter().filter(|s| s.unique) {
            let Some(key) = record.get(spec.field).and_then(IndexKey::from_value) else {
                continue;
            };
            let conflict = self
                .trees
                .get(spec.field)
                .is_some_and(|tree| tree.contains_other(&key, except));
            if conflict {
                return Err(DuplicateKeyError::new(
                    self.kind.collection(),
                    spec.field,
                    key.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Apply a write to indexes.
    ///
    /// Called AFTER the storage append succeeded.
    pub fn apply_write(&mut self, id: RecordId, record: &Record) {
        for (field, tree) in self.trees.iter_mut() {
            if let Some(key) = record.get(*field).and_then(IndexKey::from_value) {
                tree.insert(key, id);
            }
        }
    }

    /// Remove a record from all indexes.
    pub fn remove(&mut self, id: RecordId, record: &Record) {
        for (field, tree) in self.trees.iter_mut() {
            if let Some(key) = record.get(*field).and_then(IndexKey::from_value) {
                tree.remove(&key, id);
            }
        }
    }

    /// Apply an in-place update: drop old keys, index new ones.
    pub fn apply_replace(&mut self, id: RecordId, old: &Record, new: &Record) {
        self.remove(id, old);
        self.apply_write(id, new);
    }

    /// Lookup all record ids for an exact field match.
    ///
    /// Returns ids sorted ascending.
    pub fn lookup_eq(&self, field: &str, value: &FieldValue) -> IndexResult<Vec<RecordId>> {
        let tree = self.tree(field)?;
        let key = IndexKey::from_value(value)
            .ok_or_else(|| IndexError::unsupported_key(field, value.type_name()))?;
        Ok(tree.lookup_eq(&key))
    }

    /// Lookup record ids with `min <= value <= max`; `None` is unbounded.
    ///
    /// Returns ids sorted ascending.
    pub fn lookup_range(
        &self,
        field: &str,
        min: Option<&FieldValue>,
        max: Option<&FieldValue>,
    ) -> IndexResult<Vec<RecordId>> {
        let tree = self.tree(field)?;
        let to_key = |value: &FieldValue| {
            IndexKey::from_value(value)
                .ok_or_else(|| IndexError::unsupported_key(field, value.type_name()))
        };
        let min_key = min.map(to_key).transpose()?;
        let max_key = max.map(to_key).transpose()?;
        Ok(tree.lookup_range(min_key.as_ref(), max_key.as_ref()))
    }

    /// Number of distinct keys in a field's index
    pub fn key_count(&self, field: &str) -> Option<usize> {
        self.trees.get(field).map(IndexTree::key_count)
    }

    fn tree(&self, field: &str) -> IndexResult<&IndexTree> {
        self.trees
            .get(field)
            .ok_or_else(|| IndexError::not_declared(self.kind.collection(), field))
    }
}
