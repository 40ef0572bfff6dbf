//! Random access to ingested cells
//!
//! Resolving a global row is pure arithmetic: rows at or past
//! `sealed_pages * chunk_size` live in the open buffer, every other row `i`
//! lives in page `i / chunk_size` at slot `i % chunk_size`. At most one
//! sealed page is resident at a time.

use super::errors::{StorageError, StorageResult};
use super::page::{Cell, Page};
use super::page_store::PageStore;
use super::store::ColumnStore;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{classify, FieldType};

/// Where a global row lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLocation {
    /// Slot within the open buffer
    Open { slot: usize },
    /// Slot within a sealed page
    Sealed { page_no: u64, slot: usize },
}

/// Maps a global row index to its page and slot.
pub fn locate(row: u64, sealed_pages: u64, chunk_size: usize) -> RowLocation {
    let chunk = chunk_size as u64;
    let open_start = sealed_pages * chunk;
    if row >= open_start {
        RowLocation::Open {
            slot: (row - open_start) as usize,
        }
    } else {
        RowLocation::Sealed {
            page_no: row / chunk,
            slot: (row % chunk) as usize,
        }
    }
}

/// A cell together with its column's declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Column type from the schema
    pub field_type: FieldType,
    /// Stored cell
    pub cell: Cell,
}

impl FieldValue {
    /// Returns whether the cell holds no value.
    ///
    /// Both an absent field and a present-but-blank field are missing.
    pub fn is_missing(&self) -> bool {
        match &self.cell {
            Cell::Missing => true,
            Cell::Value(raw) => classify(raw).is_missing(),
        }
    }

    /// Normalized text of the value; empty for a missing cell.
    ///
    /// Surrounding whitespace is dropped. String values are always quoted.
    pub fn text(&self) -> String {
        let raw = match &self.cell {
            Cell::Value(raw) if !self.is_missing() => raw.trim(),
            _ => return String::new(),
        };

        if self.field_type == FieldType::String && !raw.starts_with('"') {
            format!("\"{}\"", raw)
        } else {
            raw.to_string()
        }
    }
}

impl<P: PageStore> ColumnStore<P> {
    /// Resolves a global row to its page and slot.
    pub fn locate(&self, row: u64) -> RowLocation {
        locate(row, self.sealed_pages, self.chunk_size)
    }

    /// Returns the cell at (`column`, `row`) with its column type.
    ///
    /// # Errors
    ///
    /// - `SOR_OUT_OF_RANGE` if the column is past the schema width or the
    ///   row is past the ingested row count
    /// - page store errors if the owning sealed page cannot be loaded
    pub fn get(&mut self, column: usize, row: u64) -> StorageResult<FieldValue> {
        let field_type = self
            .schema
            .column_type(column)
            .ok_or_else(|| StorageError::column_out_of_range(column, self.schema.len()))?;

        let total_rows = self.total_rows();
        if row >= total_rows {
            return Err(StorageError::offset_out_of_range(row, total_rows));
        }

        let cell = match self.locate(row) {
            RowLocation::Open { slot } => self
                .open
                .cell(column, slot)
                .cloned()
                .ok_or_else(|| StorageError::offset_out_of_range(row, total_rows))?,
            RowLocation::Sealed { page_no, slot } => self
                .load_resident(page_no)?
                .cell(column, slot)
                .cloned()
                .ok_or_else(|| {
                    StorageError::page_corruption(
                        page_no,
                        format!("Page has no cell for column {} slot {}", column, slot),
                    )
                })?,
        };

        Ok(FieldValue { field_type, cell })
    }

    fn load_resident(&mut self, page_no: u64) -> StorageResult<&Page> {
        let stale = self
            .resident
            .as_ref()
            .map_or(true, |page| page.page_no() != page_no);

        if stale {
            let page = self.pages.read_page(page_no)?;
            log_event_with_fields(
                Event::PageLoaded,
                &[
                    ("page", &page_no.to_string()),
                    ("rows", &page.rows().to_string()),
                ],
            );
            self.resident = Some(page);
        }

        self.resident.as_ref().ok_or_else(|| {
            StorageError::page_io_no_source(format!("Page {} is not resident", page_no))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::storage::page_store::MemoryPageStore;

    fn filled_store(rows: u64, chunk_size: usize) -> ColumnStore<MemoryPageStore> {
        let schema = Schema::new(vec![FieldType::Int, FieldType::String]);
        let mut store = ColumnStore::new(schema, chunk_size, MemoryPageStore::new());
        for i in 0..rows {
            store
                .append_row(&[i.to_string(), format!("row{}", i)])
                .unwrap();
        }
        store
    }

    #[test]
    fn test_locate_boundaries() {
        let c = 4;
        assert_eq!(locate(3, 2, c), RowLocation::Sealed { page_no: 0, slot: 3 });
        assert_eq!(locate(4, 2, c), RowLocation::Sealed { page_no: 1, slot: 0 });
        assert_eq!(locate(7, 2, c), RowLocation::Sealed { page_no: 1, slot: 3 });
        assert_eq!(locate(8, 2, c), RowLocation::Open { slot: 0 });
        assert_eq!(locate(9, 2, c), RowLocation::Open { slot: 1 });
    }

    #[test]
    fn test_get_every_row_across_pages() {
        let mut store = filled_store(11, 4);
        for i in 0..11u64 {
            let value = store.get(0, i).unwrap();
            assert_eq!(value.text(), i.to_string());
            let value = store.get(1, i).unwrap();
            assert_eq!(value.text(), format!("\"row{}\"", i));
        }
    }

    #[test]
    fn test_get_when_last_page_exactly_full() {
        let mut store = filled_store(8, 4);
        assert_eq!(store.open_rows(), 0);
        assert_eq!(store.get(0, 7).unwrap().text(), "7");
        assert!(store.get(0, 8).is_err());
    }

    #[test]
    fn test_column_out_of_range() {
        let mut store = filled_store(1, 4);
        let err = store.get(2, 0).unwrap_err();
        assert!(err.is_out_of_range());
        assert_eq!(err.message(), "Column index out of range");
    }

    #[test]
    fn test_row_out_of_range() {
        let mut store = filled_store(1, 4);
        let err = store.get(0, 1).unwrap_err();
        assert!(err.is_out_of_range());
        assert_eq!(err.message(), "Offset index out of range");
    }

    #[test]
    fn test_out_of_range_leaves_state_intact() {
        let mut store = filled_store(5, 4);
        assert!(store.get(0, 99).is_err());
        assert_eq!(store.total_rows(), 5);
        assert_eq!(store.get(0, 4).unwrap().text(), "4");
    }

    #[test]
    fn test_resident_page_reused() {
        let mut store = filled_store(9, 4);
        store.get(0, 1).unwrap();
        // Corrupting page 0 after it became resident does not affect reads
        // served from the resident copy.
        let raw = store.page_store_mut().raw_page_mut(0).unwrap();
        let mid = raw.len() / 2;
        raw[mid] ^= 0xFF;
        assert_eq!(store.get(0, 2).unwrap().text(), "2");

        // Switching to page 1 and back forces a reload that fails.
        store.get(0, 5).unwrap();
        let err = store.get(0, 0).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_string_normalization() {
        let value = |raw: &str| FieldValue {
            field_type: FieldType::String,
            cell: Cell::Value(raw.to_string()),
        };
        assert_eq!(value("hi").text(), "\"hi\"");
        assert_eq!(value("\"hi\"").text(), "\"hi\"");
        assert_eq!(value("  \"hey hey\" ").text(), "\"hey hey\"");
        assert_eq!(value("\"asdfasdf   \"").text(), "\"asdfasdf   \"");
        assert_eq!(value("!@#$%^&*()").text(), "\"!@#$%^&*()\"");
    }

    #[test]
    fn test_non_string_values_trimmed_verbatim() {
        let value = |field_type, raw: &str| FieldValue {
            field_type,
            cell: Cell::Value(raw.to_string()),
        };
        assert_eq!(value(FieldType::Int, "+1010100").text(), "+1010100");
        assert_eq!(value(FieldType::Float, " 2.").text(), "2.");
        assert_eq!(value(FieldType::Float, "1").text(), "1");
    }

    #[test]
    fn test_missing_cells() {
        let absent = FieldValue {
            field_type: FieldType::String,
            cell: Cell::Missing,
        };
        assert!(absent.is_missing());
        assert_eq!(absent.text(), "");

        let blank = FieldValue {
            field_type: FieldType::String,
            cell: Cell::Value("   ".into()),
        };
        assert!(blank.is_missing());
        assert_eq!(blank.text(), "");

        let present = FieldValue {
            field_type: FieldType::String,
            cell: Cell::Value("asdf".into()),
        };
        assert!(!present.is_missing());
    }

    /// Missingness depends on the cell alone, never on the column type.
    #[test]
    fn test_blank_cell_in_bool_column_is_missing() {
        for field_type in [FieldType::Bool, FieldType::Int, FieldType::Float] {
            let blank = FieldValue {
                field_type,
                cell: Cell::Value("  ".into()),
            };
            assert!(blank.is_missing(), "{:?}", field_type);
            assert_eq!(blank.text(), "");
        }

        let zero = FieldValue {
            field_type: FieldType::Bool,
            cell: Cell::Value("0".into()),
        };
        assert!(!zero.is_missing());
    }
}
