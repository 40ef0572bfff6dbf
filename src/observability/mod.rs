//! Observability subsystem for sorer
//!
//! Structured JSON logging of pass-level and page-level events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on the passes
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use sorer::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_threshold(Severity::Info);
//! log_event_with_fields(Event::PageSealed, &[("page", "0")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
