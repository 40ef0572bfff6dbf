//! Byte range selection for a pass over the input

use super::errors::{InputError, InputResult};

/// A `[offset, offset + length)` window into the input file.
///
/// `length == None` means the window runs to end of file. Both passes
/// (schema sampling and ingestion) are driven by the same range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    /// Starting byte offset
    pub offset: u64,
    /// Maximum number of bytes to consume, if bounded
    pub length: Option<u64>,
}

impl ByteRange {
    /// The whole file
    pub fn full() -> Self {
        Self::default()
    }

    /// Creates a range from optional CLI-style `from` / `len` values
    pub fn new(offset: Option<u64>, length: Option<u64>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            length,
        }
    }

    /// Returns whether the consumed budget allows `consumed` bytes.
    pub fn admits(&self, consumed: u64) -> bool {
        match self.length {
            Some(limit) => consumed <= limit,
            None => true,
        }
    }

    /// Checks the range against the input size.
    ///
    /// An offset equal to the file size is legal and simply yields no lines.
    pub fn validate(&self, file_size: u64) -> InputResult<()> {
        if self.offset > file_size {
            return Err(InputError::range_error(self.offset, file_size));
        }
        Ok(())
    }
}
