//! Line scanning over a byte range of the input file
//!
//! Both passes read lines the same way:
//! - seek to `range.offset`
//! - if the offset is not 0, discard the partial line up to and including
//!   the next newline (the discarded bytes count toward the budget)
//! - admit a line only if the budget still holds after adding its length;
//!   the first line that would overshoot ends the scan

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::errors::{InputError, InputResult};
use super::range::ByteRange;

/// A verified input file.
///
/// Opening checks that the file is readable and records its size; each pass
/// then opens its own handle through [`InputSource::scan`], which is released
/// when the scanner is dropped.
#[derive(Debug, Clone)]
pub struct InputSource {
    path: PathBuf,
    file_size: u64,
}

impl InputSource {
    /// Opens and stats the input file.
    ///
    /// # Errors
    ///
    /// Returns `SOR_INPUT_FILE_UNAVAILABLE` if the file cannot be opened.
    pub fn open(path: &Path) -> InputResult<Self> {
        let file = File::open(path).map_err(|e| InputError::file_unavailable(path.display(), e))?;
        let file_size = file
            .metadata()
            .map_err(|e| InputError::file_unavailable(path.display(), e))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file_size,
        })
    }

    /// Returns the input path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the input size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Starts a scan over `range`.
    ///
    /// # Errors
    ///
    /// Returns `SOR_INPUT_RANGE_ERROR` if the offset is past the end of the
    /// file, or an I/O error if the file can no longer be read.
    pub fn scan(&self, range: ByteRange) -> InputResult<LineScanner> {
        range.validate(self.file_size)?;
        LineScanner::open(&self.path, range)
    }
}

/// Sequential line reader bounded by a [`ByteRange`].
pub struct LineScanner {
    reader: BufReader<File>,
    range: ByteRange,
    /// Bytes consumed since `range.offset`, discarded fragment included
    consumed: u64,
    buf: Vec<u8>,
    exhausted: bool,
}

impl LineScanner {
    fn open(path: &Path, range: ByteRange) -> InputResult<Self> {
        let mut file =
            File::open(path).map_err(|e| InputError::file_unavailable(path.display(), e))?;
        file.seek(SeekFrom::Start(range.offset))
            .map_err(|e| InputError::read_failed(range.offset, e))?;

        let mut scanner = Self {
            reader: BufReader::new(file),
            range,
            consumed: 0,
            buf: Vec::with_capacity(256),
            exhausted: false,
        };

        if range.offset > 0 {
            scanner.consumed = scanner.read_raw()? as u64;
        }

        Ok(scanner)
    }

    /// Returns the bytes consumed so far, relative to the range offset.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    fn read_raw(&mut self) -> InputResult<usize> {
        self.buf.clear();
        let position = self.range.offset + self.consumed;
        self.reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| InputError::read_failed(position, e))
    }

    /// Reads the next admitted line, without its line terminator.
    ///
    /// Returns `Ok(None)` at end of file or once the byte budget is spent.
    /// Invalid UTF-8 is replaced rather than rejected; such bytes can only
    /// ever classify as string content.
    pub fn next_line(&mut self) -> InputResult<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }

        let read = self.read_raw()? as u64;
        if read == 0 || !self.range.admits(self.consumed + read) {
            self.exhausted = true;
            return Ok(None);
        }
        self.consumed += read;

        let mut end = self.buf.len();
        while end > 0 && (self.buf[end - 1] == b'\n' || self.buf[end - 1] == b'\r') {
            end -= 1;
        }

        Ok(Some(String::from_utf8_lossy(&self.buf[..end]).into_owned()))
    }
}
