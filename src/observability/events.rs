//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the loan store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Data directory layout created
    DataDirInitialized,

    // Store lifecycle
    /// Store open begins
    StoreOpen,
    /// Collection log replayed
    StoreReplayed,
    /// Collection log corrupted (FATAL)
    StoreCorrupted,

    // Writes
    /// Record validated and stored
    RecordInserted,
    /// Record updated in place
    RecordUpdated,
    /// Record rejected by the validator
    RecordRejected,
    /// Record rejected by a unique index
    DuplicateKey,

    // Batches
    /// Seed load begins
    SeedBegin,
    /// Seed load complete
    SeedComplete,
    /// Batch import begins
    ImportBegin,
    /// Batch import complete
    ImportComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",

            Event::StoreOpen => "STORE_OPEN",
            Event::StoreReplayed => "STORE_REPLAYED",
            Event::StoreCorrupted => "STORE_CORRUPTED",

            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::DuplicateKey => "DUPLICATE_KEY",

            Event::SeedBegin => "SEED_BEGIN",
            Event::SeedComplete => "SEED_COMPLETE",
            Event::ImportBegin => "IMPORT_BEGIN",
            Event::ImportComplete => "IMPORT_COMPLETE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreCorrupted => Severity::Fatal,
            Event::RecordRejected | Event::DuplicateKey => Severity::Warn,
            Event::RecordInserted | Event::RecordUpdated => Severity::Trace,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
