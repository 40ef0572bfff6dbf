//! CLI module for sorer
//!
//! One invocation answers one query against one file:
//! - print_col_type: column type from the sampling pass
//! - print_col_idx: normalized cell value
//! - is_missing_idx: 1 if the cell is missing, else 0

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Args, Query};
pub use commands::{execute, run};
pub use errors::{CliError, CliResult};
pub use io::{write_answer, write_line};
