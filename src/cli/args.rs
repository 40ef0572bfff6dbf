//! CLI argument definitions using clap
//!
//! ```text
//! sorer -f <FILE> [--from <BYTES>] [--len <BYTES>] [--config <PATH>]
//!       (--print_col_type <COL>
//!        | --print_col_idx <COL> <OFFSET>
//!        | --is_missing_idx <COL> <OFFSET>)
//! ```

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use super::errors::{CliError, CliResult};

/// sorer - schema-on-read queries over SoR files
#[derive(Parser, Debug)]
#[command(name = "sorer")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("query")
        .required(true)
        .args(["print_col_type", "print_col_idx", "is_missing_idx"])
))]
pub struct Args {
    /// Path to the SoR file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Byte offset to start reading from
    #[arg(long = "from")]
    pub from: Option<u64>,

    /// Number of bytes to read
    #[arg(long = "len")]
    pub len: Option<u64>,

    /// Print the type of a column
    #[arg(long = "print_col_type", value_name = "COL")]
    pub print_col_type: Option<usize>,

    /// Print the value at a column and row offset
    #[arg(long = "print_col_idx", num_args = 2, value_names = ["COL", "OFFSET"])]
    pub print_col_idx: Option<Vec<u64>>,

    /// Print 1 if the value at a column and row offset is missing, else 0
    #[arg(long = "is_missing_idx", num_args = 2, value_names = ["COL", "OFFSET"])]
    pub is_missing_idx: Option<Vec<u64>>,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// The single query a run answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Type of `column`
    ColumnType { column: usize },
    /// Normalized value at (`column`, `row`)
    CellValue { column: usize, row: u64 },
    /// Missingness of (`column`, `row`)
    IsMissing { column: usize, row: u64 },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Resolves the query flag that was given.
    pub fn query(&self) -> CliResult<Query> {
        if let Some(column) = self.print_col_type {
            return Ok(Query::ColumnType { column });
        }
        if let Some(pair) = &self.print_col_idx {
            let (column, row) = column_and_row(pair)?;
            return Ok(Query::CellValue { column, row });
        }
        if let Some(pair) = &self.is_missing_idx {
            let (column, row) = column_and_row(pair)?;
            return Ok(Query::IsMissing { column, row });
        }
        Err(CliError::Usage("no query given".into()))
    }
}

fn column_and_row(pair: &[u64]) -> CliResult<(usize, u64)> {
    match pair {
        [column, row] => {
            let column = usize::try_from(*column)
                .map_err(|_| CliError::Usage(format!("column {} too large", column)))?;
            Ok((column, *row))
        }
        _ => Err(CliError::Usage("expected <COL> <OFFSET>".into())),
    }
}
