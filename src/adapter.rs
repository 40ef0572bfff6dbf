//! Schema-on-read adapter over one SoR file
//!
//! Opening the adapter verifies the input, validates the byte range and runs
//! the sampling pass. The ingestion pass runs on the first cell query (or an
//! explicit [`SorAdapter::ingest`]), so type-only queries never touch the
//! page store.

use std::path::Path;

use crate::config::SorerConfig;
use crate::errors::{SorError, SorResult};
use crate::input::{ByteRange, InputSource};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldType, Schema, SchemaSampler};
use crate::storage::{ColumnStore, FieldValue, FilePageStore, IngestStats, StorageError};

/// A file opened for column queries.
pub struct SorAdapter {
    source: InputSource,
    range: ByteRange,
    schema: Schema,
    config: SorerConfig,
    store: Option<ColumnStore<FilePageStore>>,
}

impl SorAdapter {
    /// Opens `path`, validates `range` and infers the schema.
    ///
    /// # Errors
    ///
    /// - `SOR_INPUT_FILE_UNAVAILABLE` if the file cannot be opened
    /// - `SOR_INPUT_RANGE_ERROR` if the offset is past the end of the file
    pub fn open(path: &Path, range: ByteRange, config: &SorerConfig) -> SorResult<Self> {
        let source = InputSource::open(path)?;
        range.validate(source.file_size())?;

        let schema = SchemaSampler::new(config.sample_lines).infer(&source, range)?;

        Ok(Self {
            source,
            range,
            schema,
            config: config.clone(),
            store: None,
        })
    }

    /// The frozen schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns whether the ingestion pass already ran
    pub fn is_ingested(&self) -> bool {
        self.store.is_some()
    }

    /// Runs the ingestion pass. Calling it again is a no-op returning
    /// zeroed stats.
    pub fn ingest(&mut self) -> SorResult<IngestStats> {
        if self.store.is_some() {
            return Ok(IngestStats::default());
        }

        let (store, stats) = self.build_store()?;
        self.store = Some(store);
        Ok(stats)
    }

    fn build_store(&self) -> SorResult<(ColumnStore<FilePageStore>, IngestStats)> {
        let mut pages = match &self.config.page_dir {
            Some(dir) => FilePageStore::create(dir)?,
            None => FilePageStore::temporary()?,
        };
        if self.config.keep_pages {
            pages.keep();
        }

        let mut store = ColumnStore::new(self.schema.clone(), self.config.chunk_size, pages);
        let stats = store.ingest(&self.source, self.range)?;
        Ok((store, stats))
    }

    fn store_mut(&mut self) -> SorResult<&mut ColumnStore<FilePageStore>> {
        let store = match self.store.take() {
            Some(store) => store,
            None => self.build_store()?.0,
        };
        Ok(self.store.insert(store))
    }

    /// Number of rows ingested; runs ingestion if needed.
    pub fn row_count(&mut self) -> SorResult<u64> {
        Ok(self.store_mut()?.total_rows())
    }

    /// Type of `column`.
    ///
    /// # Errors
    ///
    /// `SOR_OUT_OF_RANGE` if `column` is past the schema width.
    pub fn column_type(&self, column: usize) -> SorResult<FieldType> {
        let result: SorResult<FieldType> = self
            .schema
            .column_type(column)
            .ok_or_else(|| StorageError::column_out_of_range(column, self.schema.len()).into());
        log_query("column_type", column, None, &result);
        result
    }

    /// Normalized text of the cell at (`column`, `row`); empty if missing.
    pub fn cell_value(&mut self, column: usize, row: u64) -> SorResult<String> {
        let result = self.field(column, row).map(|value| value.text());
        log_query("cell_value", column, Some(row), &result);
        result
    }

    /// Returns whether the cell at (`column`, `row`) holds no value.
    pub fn is_missing(&mut self, column: usize, row: u64) -> SorResult<bool> {
        let result = self.field(column, row).map(|value| value.is_missing());
        log_query("is_missing", column, Some(row), &result);
        result
    }

    fn field(&mut self, column: usize, row: u64) -> SorResult<FieldValue> {
        if column >= self.schema.len() {
            return Err(StorageError::column_out_of_range(column, self.schema.len()).into());
        }
        Ok(self.store_mut()?.get(column, row)?)
    }
}

fn log_query<T>(query: &str, column: usize, row: Option<u64>, result: &Result<T, SorError>) {
    let column = column.to_string();
    let row = row.map(|r| r.to_string()).unwrap_or_default();
    let mut fields = vec![("column", column.as_str()), ("query", query)];
    if !row.is_empty() {
        fields.push(("row", row.as_str()));
    }

    match result {
        Ok(_) => log_event_with_fields(Event::QueryExecuted, &fields),
        Err(e) if e.is_out_of_range() => {
            fields.push(("reason", e.message()));
            log_event_with_fields(Event::QueryRejected, &fields);
        }
        Err(SorError::Storage(e)) if e.is_fatal() => {
            fields.push(("reason", e.message()));
            log_event_with_fields(Event::PageCorruption, &fields);
        }
        Err(_) => {}
    }
}
