//! Columnar pages and their on-disk encoding
//!
//! The encoded page format is:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u64 LE, whole record incl. this field and checksum)
//! +------------------+
//! | Magic "SORP"     | (4 bytes)
//! +------------------+
//! | Format Version   | (u8)
//! +------------------+
//! | Page Number      | (u64 LE)
//! +------------------+
//! | Column Count     | (u32 LE)
//! +------------------+
//! | Row Count        | (u32 LE)
//! +------------------+
//! | Cells            | column-major; per cell a tag u8 (0 missing, 1 value)
//! |                  | followed for values by a u32 LE length and UTF-8 bytes
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself. The header makes a
//! page decodable without the schema.

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StorageError, StorageResult};

const PAGE_MAGIC: &[u8; 4] = b"SORP";
const PAGE_FORMAT_VERSION: u8 = 1;
const HEADER_SIZE: usize = 8 + 4 + 1 + 8 + 4 + 4;
const CHECKSUM_SIZE: usize = 4;

const TAG_MISSING: u8 = 0;
const TAG_VALUE: u8 = 1;

/// One stored cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// No field was present for this column
    Missing,
    /// Raw field text as read from the line
    Value(String),
}

/// The single mutable page under ingestion.
#[derive(Debug, Clone)]
pub struct PageBuffer {
    page_no: u64,
    columns: Vec<Vec<Cell>>,
    rows: usize,
}

impl PageBuffer {
    /// Creates an empty buffer for `page_no` with `width` columns.
    pub fn new(page_no: u64, width: usize) -> Self {
        Self {
            page_no,
            columns: vec![Vec::new(); width],
            rows: 0,
        }
    }

    /// Page number this buffer will be sealed as
    pub fn page_no(&self) -> u64 {
        self.page_no
    }

    /// Rows appended so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns whether no rows were appended
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Appends one row; columns past the row's end get `Missing`, values
    /// past the buffer width are dropped.
    pub fn push_row<S: AsRef<str>>(&mut self, values: &[S]) {
        for (i, column) in self.columns.iter_mut().enumerate() {
            let cell = match values.get(i) {
                Some(v) => Cell::Value(v.as_ref().to_string()),
                None => Cell::Missing,
            };
            column.push(cell);
        }
        self.rows += 1;
    }

    /// Cell at (`column`, `slot`)
    pub fn cell(&self, column: usize, slot: usize) -> Option<&Cell> {
        self.columns.get(column)?.get(slot)
    }

    /// Freezes the buffer into an immutable page
    pub fn seal(self) -> Page {
        Page {
            page_no: self.page_no,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// Reopens a page that never reached the page store.
impl From<Page> for PageBuffer {
    fn from(page: Page) -> Self {
        Self {
            page_no: page.page_no,
            columns: page.columns,
            rows: page.rows,
        }
    }
}

/// An immutable page of `rows` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    page_no: u64,
    columns: Vec<Vec<Cell>>,
    rows: usize,
}

impl Page {
    /// Page number
    pub fn page_no(&self) -> u64 {
        self.page_no
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (`column`, `slot`)
    pub fn cell(&self, column: usize, slot: usize) -> Option<&Cell> {
        self.columns.get(column)?.get(slot)
    }

    /// Encodes the page, checksum included.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(PAGE_MAGIC);
        body.push(PAGE_FORMAT_VERSION);
        body.extend_from_slice(&self.page_no.to_le_bytes());
        body.extend_from_slice(&(self.columns.len() as u32).to_le_bytes());
        body.extend_from_slice(&(self.rows as u32).to_le_bytes());

        for column in &self.columns {
            for cell in column {
                match cell {
                    Cell::Missing => body.push(TAG_MISSING),
                    Cell::Value(v) => {
                        body.push(TAG_VALUE);
                        body.extend_from_slice(&(v.len() as u32).to_le_bytes());
                        body.extend_from_slice(v.as_bytes());
                    }
                }
            }
        }

        let record_length = (8 + body.len() + CHECKSUM_SIZE) as u64;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);
        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Decodes a page, verifying checksum, header and page number.
    ///
    /// # Errors
    ///
    /// Returns `SOR_PAGE_CORRUPTION` on any mismatch.
    pub fn decode(expected_page_no: u64, data: &[u8]) -> StorageResult<Self> {
        let corrupt = |reason: String| StorageError::page_corruption(expected_page_no, reason);

        if data.len() < HEADER_SIZE + CHECKSUM_SIZE {
            return Err(corrupt(format!("Page too short: {} bytes", data.len())));
        }

        let mut cursor = PageCursor::new(expected_page_no, data);
        let record_length = cursor.read_u64()?;
        if record_length != data.len() as u64 {
            return Err(corrupt(format!(
                "Record length {} does not match page size {}",
                record_length,
                data.len()
            )));
        }

        let checksum_at = data.len() - CHECKSUM_SIZE;
        let mut stored = [0u8; CHECKSUM_SIZE];
        stored.copy_from_slice(&data[checksum_at..]);
        if !verify_checksum(&data[..checksum_at], u32::from_le_bytes(stored)) {
            return Err(corrupt("Page checksum mismatch".into()));
        }

        if cursor.read_bytes(PAGE_MAGIC.len())? != PAGE_MAGIC {
            return Err(corrupt("Bad page magic".into()));
        }
        let version = cursor.read_u8()?;
        if version != PAGE_FORMAT_VERSION {
            return Err(corrupt(format!("Unsupported page version {}", version)));
        }
        let page_no = cursor.read_u64()?;
        if page_no != expected_page_no {
            return Err(corrupt(format!(
                "Page number {} found where {} expected",
                page_no, expected_page_no
            )));
        }
        let width = cursor.read_u32()? as usize;
        let rows = cursor.read_u32()? as usize;

        let mut columns = Vec::with_capacity(width);
        for _ in 0..width {
            let mut column = Vec::with_capacity(rows);
            for _ in 0..rows {
                let cell = match cursor.read_u8()? {
                    TAG_MISSING => Cell::Missing,
                    TAG_VALUE => {
                        let len = cursor.read_u32()? as usize;
                        let bytes = cursor.read_bytes(len)?;
                        let text = std::str::from_utf8(bytes)
                            .map_err(|e| corrupt(format!("Cell is not UTF-8: {}", e)))?;
                        Cell::Value(text.to_string())
                    }
                    tag => return Err(corrupt(format!("Unknown cell tag {}", tag))),
                };
                column.push(cell);
            }
            columns.push(column);
        }

        if cursor.position() != checksum_at {
            return Err(corrupt(format!(
                "{} trailing bytes after cells",
                checksum_at.saturating_sub(cursor.position())
            )));
        }

        Ok(Self {
            page_no,
            columns,
            rows,
        })
    }
}

/// Bounds-checked reader over an encoded page.
struct PageCursor<'a> {
    page_no: u64,
    data: &'a [u8],
    pos: usize,
}

impl<'a> PageCursor<'a> {
    fn new(page_no: u64, data: &'a [u8]) -> Self {
        Self {
            page_no,
            data,
            pos: 0,
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn read_bytes(&mut self, len: usize) -> StorageResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len() - CHECKSUM_SIZE)
            .ok_or_else(|| {
                StorageError::page_corruption(
                    self.page_no,
                    format!("Truncated page at byte {}", self.pos),
                )
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> StorageResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> StorageResult<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> StorageResult<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_bytes(8)?);
        Ok(u64::from_le_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        let mut buffer = PageBuffer::new(2, 3);
        buffer.push_row(&["0", "asdf", ""]);
        buffer.push_row(&["1"]);
        buffer.push_row(&["  \"hey\" ", "héllo", "2.5"]);
        buffer.seal()
    }

    #[test]
    fn test_short_row_fills_missing() {
        let page = sample_page();
        assert_eq!(page.rows(), 3);
        assert_eq!(page.cell(0, 1), Some(&Cell::Value("1".into())));
        assert_eq!(page.cell(1, 1), Some(&Cell::Missing));
        assert_eq!(page.cell(2, 1), Some(&Cell::Missing));
    }

    #[test]
    fn test_empty_field_stored_as_value() {
        let page = sample_page();
        assert_eq!(page.cell(2, 0), Some(&Cell::Value(String::new())));
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let page = sample_page();
        assert_eq!(page.cell(3, 0), None);
        assert_eq!(page.cell(0, 3), None);
    }

    #[test]
    fn test_decode_restores_page() {
        let page = sample_page();
        let decoded = Page::decode(2, &page.encode()).unwrap();
        assert_eq!(decoded, page);
        assert_eq!(decoded.width(), 3);
    }

    #[test]
    fn test_zero_width_page_keeps_row_count() {
        let mut buffer = PageBuffer::new(0, 0);
        buffer.push_row::<&str>(&[]);
        buffer.push_row(&[""]);
        let page = buffer.seal();
        let decoded = Page::decode(0, &page.encode()).unwrap();
        assert_eq!(decoded.rows(), 2);
        assert_eq!(decoded.width(), 0);
    }

    #[test]
    fn test_bit_flip_detected() {
        let mut encoded = sample_page().encode();
        let mid = encoded.len() / 2;
        encoded[mid] ^= 0xFF;
        let err = Page::decode(2, &encoded).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.message().to_lowercase().contains("checksum"));
    }

    #[test]
    fn test_truncation_detected() {
        let encoded = sample_page().encode();
        let err = Page::decode(2, &encoded[..encoded.len() - 3]).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_wrong_page_number_detected() {
        let encoded = sample_page().encode();
        let err = Page::decode(5, &encoded).unwrap_err();
        assert!(err.message().contains("Page number"));
    }
}
