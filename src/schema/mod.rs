//! Schema subsystem for sorer
//!
//! Schemas are inferred on read: a sampling pass classifies every field of a
//! bounded prefix and widens each column along the type lattice. Once
//! finalized, the schema is read-only and every ingested row is validated
//! against it.
//!
//! # Rules
//!
//! - Widening only (a column never narrows)
//! - Width is the widest sampled row
//! - No re-inference after ingestion begins
//! - Validation is deterministic

mod errors;
mod lattice;
mod sampler;
mod types;
mod validator;

pub use errors::{RejectionReason, RowRejection};
pub use lattice::{classify, widen};
pub use sampler::{infer_schema, SchemaSampler, DEFAULT_SAMPLE_LINES};
pub use types::{Classification, FieldType, Schema, SchemaBuilder};
pub use validator::{is_valid, RowValidator};
