//! Bracketed field extraction
//!
//! A SoR line is a run of `<content>` fields with no separator requirement
//! between them. Content is returned verbatim, quotes and padding included.

/// Opening field delimiter
pub const FIELD_OPEN: char = '<';

/// Closing field delimiter
pub const FIELD_CLOSE: char = '>';

/// Extracts every top-level bracketed field of `line`, left to right.
///
/// A `<` seen while a field is already open restarts the field, so nested
/// brackets never produce a field. An unterminated trailing `<...` (as left
/// by a byte-range cut) contributes nothing.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut open: Option<usize> = None;

    for (idx, c) in line.char_indices() {
        match c {
            FIELD_OPEN => open = Some(idx + c.len_utf8()),
            FIELD_CLOSE => {
                if let Some(start) = open.take() {
                    fields.push(&line[start..idx]);
                }
            }
            _ => {}
        }
    }

    fields
}
