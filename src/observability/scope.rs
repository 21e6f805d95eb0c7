//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` on `complete`
//! - Logs `{name}_ERROR` on `fail`, `{name}_INCOMPLETE` if dropped unfinished

use std::cell::Cell;
use std::time::Instant;

use super::logger::{Logger, Severity};

/// A scope that logs begin and complete events around a unit of work
///
/// ```ignore
/// let scope = ObservationScope::new("STORE_OPEN");
/// // ... replay collections ...
/// scope.complete_with_fields(&[("records", "42")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Logs `{name}_BEGIN` immediately.
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Like `new`, carrying fields into every line the scope logs.
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Logs `{name}_COMPLETE` with elapsed time.
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Logs `{name}_COMPLETE` with elapsed time and extra fields.
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.finish(Severity::Info, "COMPLETE", extra_fields);
    }

    /// Logs `{name}_ERROR` at ERROR level.
    pub fn fail(self, reason: &str) {
        self.finish(Severity::Error, "ERROR", &[("reason", reason)]);
    }

    /// Logs `{name}_ERROR` at FATAL level.
    pub fn fail_fatal(self, reason: &str) {
        self.finish(Severity::Fatal, "ERROR", &[("reason", reason)]);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn finish(&self, severity: Severity, suffix: &str, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_ms();
        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed.as_str()));

        Logger::log(severity, &format!("{}_{}", self.name, suffix), &all_fields);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
