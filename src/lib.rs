//! sorer - schema-on-read columnar adapter for SoR files
//!
//! A SoR file holds one record per line with fields written as `<value>`.
//! The adapter infers a column type for each position from a sample of the
//! input, ingests conforming rows into checksummed columnar pages, and
//! answers type, value and missingness queries by (column, row).

pub mod adapter;
pub mod cli;
pub mod config;
pub mod errors;
pub mod input;
pub mod observability;
pub mod schema;
pub mod storage;

pub use adapter::SorAdapter;
pub use config::SorerConfig;
pub use errors::{SorError, SorResult};
