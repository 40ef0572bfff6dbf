//! Observable events for sorer
//!
//! Events are explicit and typed. Each one carries the severity it is logged
//! at.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Schema pass
    /// Sampling pass finished and the schema is frozen
    SchemaInferred,

    // Ingestion pass
    /// Ingestion pass begins
    IngestStart,
    /// Ingestion pass complete
    IngestComplete,
    /// A malformed row was dropped
    RowRejected,

    // Pages
    /// Open buffer sealed and persisted
    PageSealed,
    /// Sealed page loaded back from the page store
    PageLoaded,
    /// Persisted page failed verification (FATAL)
    PageCorruption,
    /// Spill directory created for this run
    SpillDirCreated,
    /// Spill directory removed on drop
    SpillDirRemoved,

    // Query pass
    /// Query answered
    QueryExecuted,
    /// Query rejected (out of range)
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::SchemaInferred => "SCHEMA_INFERRED",

            Event::IngestStart => "INGEST_BEGIN",
            Event::IngestComplete => "INGEST_COMPLETE",
            Event::RowRejected => "ROW_REJECTED",

            Event::PageSealed => "PAGE_SEALED",
            Event::PageLoaded => "PAGE_LOADED",
            Event::PageCorruption => "PAGE_CORRUPTION",
            Event::SpillDirCreated => "SPILL_DIR_CREATED",
            Event::SpillDirRemoved => "SPILL_DIR_REMOVED",

            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::PageCorruption)
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PageCorruption => Severity::Fatal,
            Event::QueryRejected => Severity::Warn,
            Event::RowRejected | Event::PageLoaded => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
