//! Paged columnar store
//!
//! The store owns the frozen schema, exactly one open buffer, and the count
//! of sealed pages. Rows land in the open buffer; when it reaches
//! `chunk_size` rows it is sealed, written to the page store under its page
//! number, and replaced by an empty buffer.
//!
//! Page `p` owns global rows `[p * chunk_size, (p + 1) * chunk_size)`.

use super::errors::StorageResult;
use super::page::{Page, PageBuffer};
use super::page_store::PageStore;
use crate::errors::SorResult;
use crate::input::{tokenize, ByteRange, InputSource};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::schema::{RowValidator, Schema};

/// Default number of rows per page
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Largest row count a page header can record
pub const MAX_CHUNK_SIZE: usize = u32::MAX as usize;

/// Counters for one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines admitted by the byte range
    pub lines_read: u64,
    /// Rows that passed validation
    pub rows_ingested: u64,
    /// Rows dropped as malformed
    pub rows_rejected: u64,
    /// Pages sealed during the pass
    pub pages_sealed: u64,
}

/// Columnar store over a page store `P`.
pub struct ColumnStore<P: PageStore> {
    pub(super) schema: Schema,
    pub(super) chunk_size: usize,
    pub(super) open: PageBuffer,
    pub(super) sealed_pages: u64,
    pub(super) pages: P,
    /// Last sealed page loaded for a query
    pub(super) resident: Option<Page>,
}

impl<P: PageStore> ColumnStore<P> {
    /// Creates an empty store. `chunk_size` is clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn new(schema: Schema, chunk_size: usize, pages: P) -> Self {
        let open = PageBuffer::new(0, schema.len());
        Self {
            schema,
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
            open,
            sealed_pages: 0,
            pages,
            resident: None,
        }
    }

    /// The frozen schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows per page
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of sealed pages
    pub fn sealed_pages(&self) -> u64 {
        self.sealed_pages
    }

    /// Rows held by the open buffer
    pub fn open_rows(&self) -> usize {
        self.open.rows()
    }

    /// Total rows ingested across sealed pages and the open buffer
    pub fn total_rows(&self) -> u64 {
        self.sealed_pages * self.chunk_size as u64 + self.open.rows() as u64
    }

    /// The underlying page store
    pub fn page_store(&self) -> &P {
        &self.pages
    }

    /// Mutable access to the underlying page store
    #[cfg(test)]
    pub(crate) fn page_store_mut(&mut self) -> &mut P {
        &mut self.pages
    }

    /// Appends one validated row, sealing the open buffer when it fills.
    pub fn append_row<S: AsRef<str>>(&mut self, values: &[S]) -> StorageResult<()> {
        self.open.push_row(values);
        if self.open.rows() >= self.chunk_size {
            self.seal_open()?;
        }
        Ok(())
    }

    fn seal_open(&mut self) -> StorageResult<()> {
        let next = PageBuffer::new(self.sealed_pages + 1, self.schema.len());
        let page = std::mem::replace(&mut self.open, next).seal();

        if let Err(e) = self.pages.write_page(&page) {
            self.open = PageBuffer::from(page);
            return Err(e);
        }
        self.sealed_pages += 1;

        log_event_with_fields(
            Event::PageSealed,
            &[
                ("page", &page.page_no().to_string()),
                ("rows", &page.rows().to_string()),
            ],
        );
        Ok(())
    }

    /// Tokenizes, validates and appends one line.
    ///
    /// Returns `Ok(false)` when the row was dropped as malformed.
    pub fn ingest_line(&mut self, line: &str) -> StorageResult<bool> {
        let fields = tokenize(line);

        if let Err(rejection) = RowValidator::new(&self.schema).check(&fields) {
            if Logger::enabled(Severity::Trace) {
                log_event_with_fields(
                    Event::RowRejected,
                    &[("line", line), ("reason", &rejection.to_string())],
                );
            }
            return Ok(false);
        }

        self.append_row(&fields)?;
        Ok(true)
    }

    /// Ingests in-memory lines.
    pub fn ingest_lines<I, S>(&mut self, lines: I) -> StorageResult<IngestStats>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sealed_before = self.sealed_pages;
        let mut stats = IngestStats::default();

        for line in lines {
            self.record(&mut stats, line.as_ref())?;
        }

        stats.pages_sealed = self.sealed_pages - sealed_before;
        Ok(stats)
    }

    /// Runs the ingestion pass over `range` of `source`.
    ///
    /// Uses the same partial-line discard and inclusive byte boundary as
    /// the sampling pass, without a line cap.
    pub fn ingest(&mut self, source: &InputSource, range: ByteRange) -> SorResult<IngestStats> {
        log_event(Event::IngestStart);

        let sealed_before = self.sealed_pages;
        let mut stats = IngestStats::default();
        let mut scanner = source.scan(range)?;

        while let Some(line) = scanner.next_line()? {
            self.record(&mut stats, &line)?;
        }
        stats.pages_sealed = self.sealed_pages - sealed_before;

        log_event_with_fields(
            Event::IngestComplete,
            &[
                ("bytes", &scanner.consumed().to_string()),
                ("lines", &stats.lines_read.to_string()),
                ("pages_sealed", &stats.pages_sealed.to_string()),
                ("rejected", &stats.rows_rejected.to_string()),
                ("rows", &stats.rows_ingested.to_string()),
            ],
        );

        Ok(stats)
    }

    fn record(&mut self, stats: &mut IngestStats, line: &str) -> StorageResult<()> {
        stats.lines_read += 1;
        if self.ingest_line(line)? {
            stats.rows_ingested += 1;
        } else {
            stats.rows_rejected += 1;
        }
        Ok(())
    }
}
