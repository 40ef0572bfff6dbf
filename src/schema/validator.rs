//! Row validation against a finalized schema
//!
//! A row is compatible when every field fits its column:
//! - fields past the schema width must be missing
//! - every other field must classify at most as wide as its column
//! - short rows are fine; absent columns read as missing
//!
//! Validation is a pure function of (row, schema).

use super::errors::RowRejection;
use super::lattice::classify;
use super::types::{Classification, Schema};

/// Validates tokenized rows against a schema.
pub struct RowValidator<'a> {
    schema: &'a Schema,
}

impl<'a> RowValidator<'a> {
    /// Creates a validator for the given schema.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Returns the schema this validator checks against.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Returns whether the row may be ingested.
    pub fn is_valid<S: AsRef<str>>(&self, row: &[S]) -> bool {
        self.check(row).is_ok()
    }

    /// Checks a row, naming the first offending field on failure.
    pub fn check<S: AsRef<str>>(&self, row: &[S]) -> Result<(), RowRejection> {
        for (i, field) in row.iter().enumerate() {
            let observed = classify(field.as_ref());

            let Some(column_type) = self.schema.column_type(i) else {
                if !observed.is_missing() {
                    return Err(RowRejection::extra_column(i, observed));
                }
                continue;
            };

            match observed {
                Classification::Invalid => {
                    return Err(RowRejection::invalid_field(i, Some(column_type)));
                }
                Classification::Typed(t) if !column_type.admits(t) => {
                    return Err(RowRejection::wider_than_column(i, column_type, t));
                }
                Classification::Typed(_) => {}
            }
        }

        Ok(())
    }
}

/// Free-function form of [`RowValidator::is_valid`].
pub fn is_valid<S: AsRef<str>>(row: &[S], schema: &Schema) -> bool {
    RowValidator::new(schema).is_valid(row)
}
