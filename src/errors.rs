//! Crate-level error type
//!
//! Passes that touch both the input file and the page store report through
//! [`SorError`]; each variant keeps the subsystem error intact.

use thiserror::Error;

use crate::input::InputError;
use crate::storage::StorageError;

/// Result type for multi-subsystem operations
pub type SorResult<T> = Result<T, SorError>;

/// Errors raised by the adapter passes
#[derive(Debug, Error)]
pub enum SorError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SorError {
    /// Human-readable message without code or severity
    pub fn message(&self) -> &str {
        match self {
            SorError::Input(e) => e.message(),
            SorError::Storage(e) => e.message(),
        }
    }

    /// Returns whether the run must abort
    pub fn is_fatal(&self) -> bool {
        match self {
            SorError::Input(e) => e.is_fatal(),
            SorError::Storage(e) => e.is_fatal(),
        }
    }

    /// Returns whether this is a rejected query rather than a failure
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SorError::Storage(e) if e.is_out_of_range())
    }
}
