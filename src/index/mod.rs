//! Index Manager subsystem for loandb
//!
//! Indexes are derived, in-memory-only state rebuilt from the collection logs
//! when a store is opened.
//!
//! # Design Principles
//!
//! - Derived state: Indexes mirror storage, never the source of truth
//! - Declared in the schema catalog, one tree per declared field
//! - Deterministic: BTreeMap iteration order, sorted record ids
//!
//! # Invariants
//!
//! - Unique indexes are checked before the storage append
//! - Updates occur AFTER storage writes
//! - Lookup returns sorted record ids ascending

mod btree;
mod errors;
mod manager;

pub use btree::{IndexKey, IndexTree, RecordId};
pub use errors::{IndexError, IndexErrorCode, IndexResult};
pub use manager::IndexManager;
