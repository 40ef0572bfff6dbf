//! Answer output for the CLI
//!
//! - One answer per run, one line on stdout
//! - Diagnostics and logs go to stderr, never stdout

use std::io::{self, Write};

use super::errors::CliResult;

/// Write the answer line to stdout
pub fn write_answer(answer: &str) -> CliResult<()> {
    let stdout = io::stdout();
    write_line(&mut stdout.lock(), answer)
}

/// Write `answer` followed by a newline and flush
pub fn write_line<W: Write>(writer: &mut W, answer: &str) -> CliResult<()> {
    writeln!(writer, "{}", answer)?;
    writer.flush()?;
    Ok(())
}
