//! Storage error types
//!
//! Error codes:
//! - SOR_OUT_OF_RANGE (ERROR severity)
//! - SOR_PAGE_IO_ERROR (ERROR severity)
//! - SOR_PAGE_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, store remains usable
    Error,
    /// Run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Column index or row offset outside current bounds
    SorOutOfRange,
    /// Page file could not be written or read
    SorPageIoError,
    /// Page failed checksum or structural verification
    SorPageCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::SorOutOfRange => "SOR_OUT_OF_RANGE",
            StorageErrorCode::SorPageIoError => "SOR_PAGE_IO_ERROR",
            StorageErrorCode::SorPageCorruption => "SOR_PAGE_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::SorOutOfRange => Severity::Error,
            StorageErrorCode::SorPageIoError => Severity::Error,
            StorageErrorCode::SorPageCorruption => Severity::Fatal,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    /// Column index at or past the schema width
    pub fn column_out_of_range(column: usize, width: usize) -> Self {
        Self {
            code: StorageErrorCode::SorOutOfRange,
            message: "Column index out of range".into(),
            details: Some(format!("column: {}, columns: {}", column, width)),
            source: None,
        }
    }

    /// Row offset at or past the ingested row count
    pub fn offset_out_of_range(row: u64, total_rows: u64) -> Self {
        Self {
            code: StorageErrorCode::SorOutOfRange,
            message: "Offset index out of range".into(),
            details: Some(format!("offset: {}, rows: {}", row, total_rows)),
            source: None,
        }
    }

    /// Page store I/O failure
    pub fn page_io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::SorPageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Page store failure without an I/O source
    pub fn page_io_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::SorPageIoError,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Corrupted page (FATAL)
    pub fn page_corruption(page_no: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::SorPageCorruption,
            message: reason.into(),
            details: Some(format!("page: {}", page_no)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
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

    /// Returns whether this is an out-of-range query error
    pub fn is_out_of_range(&self) -> bool {
        self.code == StorageErrorCode::SorOutOfRange
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
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

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StorageErrorCode::SorOutOfRange.code(), "SOR_OUT_OF_RANGE");
        assert_eq!(StorageErrorCode::SorPageIoError.code(), "SOR_PAGE_IO_ERROR");
        assert_eq!(StorageErrorCode::SorPageCorruption.code(), "SOR_PAGE_CORRUPTION");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(StorageErrorCode::SorOutOfRange.severity(), Severity::Error);
        assert_eq!(StorageErrorCode::SorPageIoError.severity(), Severity::Error);
        assert_eq!(StorageErrorCode::SorPageCorruption.severity(), Severity::Fatal);
    }

    #[test]
    fn test_out_of_range_not_fatal() {
        let err = StorageError::column_out_of_range(3, 3);
        assert!(err.is_out_of_range());
        assert!(!err.is_fatal());
        assert_eq!(err.message(), "Column index out of range");

        let err = StorageError::offset_out_of_range(1, 1);
        assert_eq!(err.message(), "Offset index out of range");
    }

    #[test]
    fn test_corruption_display() {
        let err = StorageError::page_corruption(4, "checksum mismatch");
        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("SOR_PAGE_CORRUPTION"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("page: 4"));
        assert_eq!(err.details(), Some("page: 4"));
    }
}
