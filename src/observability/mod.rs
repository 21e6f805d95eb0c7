//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Counter metrics
//! - Begin/complete scopes around long operations
//!
//! Observability is read-only: nothing here changes what a write does.
//!
//! ```ignore
//! use loandb::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::RecordRejected, &[("collection", "loan_applications")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_rejected();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
