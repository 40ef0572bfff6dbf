//! CLI command implementation
//!
//! A run loads configuration, opens the adapter (sampling pass), then
//! answers its query. Type queries stop after sampling; cell queries also
//! run ingestion.

use std::path::Path;

use crate::adapter::SorAdapter;
use crate::config::SorerConfig;
use crate::input::ByteRange;
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::{Args, Query};
use super::errors::CliResult;
use super::io::write_answer;

/// Parse arguments, answer the query and print the answer.
pub fn run() -> CliResult<()> {
    let args = Args::parse_args();
    let answer = execute(&args)?;
    write_answer(&answer)
}

/// Answers the query described by `args`, returning the output line.
pub fn execute(args: &Args) -> CliResult<String> {
    let query = args.query()?;
    let config = load_config(args.config.as_deref())?;

    let range = ByteRange::new(args.from, args.len);
    let mut adapter = SorAdapter::open(&args.file, range, &config)?;

    let answer = match query {
        Query::ColumnType { column } => adapter.column_type(column)?.to_string(),
        Query::CellValue { column, row } => adapter.cell_value(column, row)?,
        Query::IsMissing { column, row } => {
            if adapter.is_missing(column, row)? {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
    };

    Ok(answer)
}

fn load_config(path: Option<&Path>) -> CliResult<SorerConfig> {
    let config = match path {
        Some(path) => SorerConfig::load(path)?,
        None => SorerConfig::default(),
    };

    Logger::set_threshold(config.log_severity());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("chunk_size", &config.chunk_size.to_string()),
            ("sample_lines", &config.sample_lines.to_string()),
        ],
    );

    Ok(config)
}
