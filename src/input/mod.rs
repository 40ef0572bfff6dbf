//! Input subsystem for sorer
//!
//! Turns a byte range of a SoR file into a stream of lines and each line into
//! its raw bracketed fields. Nothing here knows about types or schemas.

mod errors;
mod range;
mod scanner;
mod tokenizer;

pub use errors::{InputError, InputErrorCode, InputResult};
pub use range::ByteRange;
pub use scanner::{InputSource, LineScanner};
pub use tokenizer::{tokenize, FIELD_CLOSE, FIELD_OPEN};
