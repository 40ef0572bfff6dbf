//! Paged columnar storage for ingested rows
//!
//! Rows that pass validation are appended to a single open buffer. A full
//! buffer is sealed into an immutable page and spilled through a
//! [`PageStore`]; queries reload sealed pages on demand.
//!
//! # Design Principles
//!
//! - Column-major pages sealed at exactly `chunk_size` rows
//! - Checksum-verified on every page load
//! - Halt on corruption
//! - One resident sealed page at a time

mod accessor;
mod checksum;
mod errors;
mod page;
mod page_store;
mod store;

pub use accessor::{locate, FieldValue, RowLocation};
pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use page::{Cell, Page, PageBuffer};
pub use page_store::{FilePageStore, MemoryPageStore, PageStore};
pub use store::{ColumnStore, IngestStats, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
