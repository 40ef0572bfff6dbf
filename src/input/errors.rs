//! Input error types
//!
//! Error codes:
//! - SOR_INPUT_FILE_UNAVAILABLE (FATAL)
//! - SOR_INPUT_RANGE_ERROR (FATAL)
//! - SOR_INPUT_READ_FAILED (FATAL)
//!
//! Every input error aborts the run before or during a pass; none of them
//! are recoverable per row.

use std::fmt;
use std::io;

/// Severity levels for input errors
///
/// Input failures always end the run, so there is no recoverable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Input-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorCode {
    /// Input file cannot be opened or inspected
    SorFileUnavailable,
    /// Starting byte offset lies beyond the end of the file
    SorConfigRangeError,
    /// Reading a line failed mid-pass
    SorInputReadFailed,
}

impl InputErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            InputErrorCode::SorFileUnavailable => "SOR_INPUT_FILE_UNAVAILABLE",
            InputErrorCode::SorConfigRangeError => "SOR_INPUT_RANGE_ERROR",
            InputErrorCode::SorInputReadFailed => "SOR_INPUT_READ_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for InputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Input error with context
#[derive(Debug)]
pub struct InputError {
    code: InputErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl InputError {
    /// The input file cannot be opened
    pub fn file_unavailable(path: impl fmt::Display, source: io::Error) -> Self {
        Self {
            code: InputErrorCode::SorFileUnavailable,
            message: "File cannot be opened".into(),
            details: Some(format!("path: {}", path)),
            source: Some(source),
        }
    }

    /// Starting offset is past the end of the file
    pub fn range_error(from: u64, file_size: u64) -> Self {
        Self {
            code: InputErrorCode::SorConfigRangeError,
            message: "From index larger than filesize".into(),
            details: Some(format!("from: {}, file_size: {}", from, file_size)),
            source: None,
        }
    }

    /// A read failed at the given byte offset
    pub fn read_failed(offset: u64, source: io::Error) -> Self {
        Self {
            code: InputErrorCode::SorInputReadFailed,
            message: "Failed to read input".into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> InputErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error aborts the run
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for input operations
pub type InputResult<T> = Result<T, InputError>;
