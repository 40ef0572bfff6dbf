//! Schema inference from a prefix of the input
//!
//! The sampler scans at most `max_lines` admitted lines of the byte range,
//! tokenizes each, and widens a running schema. The result is frozen; later
//! passes validate against it and never widen it.

use super::lattice::classify;
use super::types::{Schema, SchemaBuilder};
use crate::input::{tokenize, ByteRange, InputResult, InputSource};
use crate::observability::{log_event_with_fields, Event};

/// Default number of lines sampled for inference
pub const DEFAULT_SAMPLE_LINES: usize = 500;

/// Infers a schema from the first lines of a byte range.
#[derive(Debug, Clone, Copy)]
pub struct SchemaSampler {
    max_lines: usize,
}

impl Default for SchemaSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_LINES)
    }
}

impl SchemaSampler {
    /// Creates a sampler that reads at most `max_lines` lines.
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }

    /// Runs the sampling pass over `range` of `source`.
    ///
    /// # Errors
    ///
    /// Returns an input error if the range is invalid or the file cannot be
    /// read. Malformed fields never fail inference.
    pub fn infer(&self, source: &InputSource, range: ByteRange) -> InputResult<Schema> {
        let mut scanner = source.scan(range)?;
        let mut builder = SchemaBuilder::new();
        let mut lines = 0usize;

        while lines < self.max_lines {
            let Some(line) = scanner.next_line()? else {
                break;
            };
            observe_line(&mut builder, &line);
            lines += 1;
        }

        let schema = builder.finalize();
        log_event_with_fields(
            Event::SchemaInferred,
            &[
                ("bytes", &scanner.consumed().to_string()),
                ("columns", &schema.len().to_string()),
                ("lines", &lines.to_string()),
                ("schema", &schema.to_string()),
            ],
        );

        Ok(schema)
    }

    /// Infers a schema from in-memory lines, applying the same line cap.
    pub fn infer_lines<I, S>(&self, lines: I) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = SchemaBuilder::new();
        for line in lines.into_iter().take(self.max_lines) {
            observe_line(&mut builder, line.as_ref());
        }
        builder.finalize()
    }
}

fn observe_line(builder: &mut SchemaBuilder, line: &str) {
    for (i, field) in tokenize(line).into_iter().enumerate() {
        builder.observe(i, classify(field));
    }
}

/// Runs the sampling pass with the default line cap.
pub fn infer_schema(source: &InputSource, range: ByteRange) -> InputResult<Schema> {
    SchemaSampler::default().infer(source, range)
}
