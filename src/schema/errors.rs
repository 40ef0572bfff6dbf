//! Row rejection details
//!
//! A rejected row is a data-quality event, not an error: ingestion drops it
//! and moves on. The details exist so the drop can be traced.

use std::fmt;

use super::types::{Classification, FieldType};

/// Why a row failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Non-missing field past the inferred schema width
    ExtraColumn,
    /// Field classified wider than the column type
    WiderThanColumn,
    /// Field cannot appear in a well-formed row
    InvalidField,
}

impl RejectionReason {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::ExtraColumn => "EXTRA_COLUMN",
            RejectionReason::WiderThanColumn => "WIDER_THAN_COLUMN",
            RejectionReason::InvalidField => "INVALID_FIELD",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// First offending field of a malformed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// Column index of the offending field
    pub column: usize,
    /// Rejection reason
    pub reason: RejectionReason,
    /// Column type from the schema, if the column exists
    pub expected: Option<FieldType>,
    /// Classification of the field
    pub actual: Classification,
}

impl RowRejection {
    pub fn extra_column(column: usize, actual: Classification) -> Self {
        Self {
            column,
            reason: RejectionReason::ExtraColumn,
            expected: None,
            actual,
        }
    }

    pub fn wider_than_column(column: usize, expected: FieldType, actual: FieldType) -> Self {
        Self {
            column,
            reason: RejectionReason::WiderThanColumn,
            expected: Some(expected),
            actual: Classification::Typed(actual),
        }
    }

    pub fn invalid_field(column: usize, expected: Option<FieldType>) -> Self {
        Self {
            column,
            reason: RejectionReason::InvalidField,
            expected,
            actual: Classification::Invalid,
        }
    }
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected {
            Some(expected) => write!(
                f,
                "column {}: {} (expected at most {}, got {})",
                self.column, self.reason, expected, self.actual
            ),
            None => write!(
                f,
                "column {}: {} (got {})",
                self.column, self.reason, self.actual
            ),
        }
    }
}
