//! BTreeMap-based index structures
//!
//! Indexes use BTreeMap<IndexKey, Vec<RecordId>> for deterministic ordering.
//! Record ids are always sorted ascending.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use chrono::{DateTime, Utc};

use crate::schema::FieldValue;

/// Storage-assigned record identifier, monotonic per collection
pub type RecordId = u64;

/// Index key derived from a field value.
///
/// Ints and reals share one numeric key space so `1` and `1.0` collide.
/// Ordering is deterministic: Number < Date < String.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    /// Numeric value (f64 bits mapped for total ordering)
    Number(u64),
    /// UTC timestamp
    Date(DateTime<Utc>),
    /// String value
    String(String),
}

impl IndexKey {
    /// Create a key from a number
    ///
    /// Uses bit representation for total ordering.
    pub fn from_number(v: f64) -> Self {
        // -0.0 and 0.0 must map to the same key
        let v = if v == 0.0 { 0.0 } else { v };
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits // Negative: flip all bits
        } else {
            bits ^ (1 << 63) // Positive: flip sign bit
        };
        IndexKey::Number(ordered)
    }

    /// Create a key from a string
    pub fn from_string(v: impl Into<String>) -> Self {
        IndexKey::String(v.into())
    }

    /// Create a key from a field value.
    ///
    /// Null and nested objects are not indexed.
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(IndexKey::from_string(s.as_str())),
            FieldValue::Int(i) => Some(IndexKey::from_number(*i as f64)),
            FieldValue::Real(r) if !r.is_nan() => Some(IndexKey::from_number(*r)),
            FieldValue::Date(d) => Some(IndexKey::Date(*d)),
            _ => None,
        }
    }

    /// Inverse of the numeric bit mapping
    fn number(bits: u64) -> f64 {
        let raw = if (bits >> 63) == 1 {
            bits ^ (1 << 63)
        } else {
            !bits
        };
        f64::from_bits(raw)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Number(bits) => write!(f, "{}", Self::number(*bits)),
            IndexKey::Date(d) => write!(f, "{}", d.to_rfc3339()),
            IndexKey::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// A single field index using BTreeMap for deterministic ordering.
#[derive(Debug, Default)]
pub struct IndexTree {
    /// Maps key values to sorted lists of record ids
    tree: BTreeMap<IndexKey, Vec<RecordId>>,
}

impl IndexTree {
    /// Creates a new empty index tree
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
        }
    }

    /// Insert a record id for a key.
    ///
    /// Maintains sorted ascending order.
    pub fn insert(&mut self, key: IndexKey, id: RecordId) {
        let ids = self.tree.entry(key).or_default();

        match ids.binary_search(&id) {
            Ok(_) => {} // Already exists
            Err(pos) => ids.insert(pos, id),
        }
    }

    /// Remove a record id for a key.
    ///
    /// If the key has no more ids, removes the key entirely.
    pub fn remove(&mut self, key: &IndexKey, id: RecordId) {
        if let Some(ids) = self.tree.get_mut(key) {
            if let Ok(pos) = ids.binary_search(&id) {
                ids.remove(pos);
            }
            if ids.is_empty() {
                self.tree.remove(key);
            }
        }
    }

    /// Lookup all record ids for an exact key match.
    ///
    /// Returns ids sorted ascending.
    pub fn lookup_eq(&self, key: &IndexKey) -> Vec<RecordId> {
        self.tree.get(key).cloned().unwrap_or_default()
    }

    /// Whether any record other than `except` holds the key
    pub fn contains_other(&self, key: &IndexKey, except: Option<RecordId>) -> bool {
        self.tree
            .get(key)
            .is_some_and(|ids| ids.iter().any(|id| Some(*id) != except))
    }

    /// Lookup record ids in a range [min, max] (inclusive).
    ///
    /// Returns ids sorted ascending.
    /// If min is None, starts from the beginning.
    /// If max is None, goes to the end.
    pub fn lookup_range(&self, min: Option<&IndexKey>, max: Option<&IndexKey>) -> Vec<RecordId> {
        if let (Some(lo), Some(hi)) = (min, max) {
            // BTreeMap::range panics on inverted bounds
            if lo > hi {
                return Vec::new();
            }
        }

        let min_bound: Bound<&IndexKey> = match min {
            Some(k) => Bound::Included(k),
            None => Bound::Unbounded,
        };
        let max_bound: Bound<&IndexKey> = match max {
            Some(k) => Bound::Included(k),
            None => Bound::Unbounded,
        };

        let mut result = Vec::new();
        for (_, ids) in self.tree.range((min_bound, max_bound)) {
            result.extend(ids);
        }

        // Sort to ensure deterministic order even when combining multiple keys
        result.sort_unstable();
        result
    }

    /// Returns the number of distinct keys
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns the total number of record ids
    pub fn entry_count(&self) -> usize {
        self.tree.values().map(|v| v.len()).sum()
    }
}
