//! Field classification
//!
//! Rules, first match wins, surrounding whitespace ignored:
//!
//! 1. empty → MISSING
//! 2. `0` or `1` → BOOL
//! 3. optional sign, ASCII digits (possibly none) → INT
//! 4. optional sign, digits, `.`, digits (either run may be empty) → FLOAT
//! 5. anything else → STRING
//!
//! A field holding a bracket delimiter can never come out of a well-formed
//! line and classifies as INVALID.

use super::types::{Classification, FieldType};
use crate::input::{FIELD_CLOSE, FIELD_OPEN};

/// Classifies one raw field.
pub fn classify(field: &str) -> Classification {
    if field.contains(FIELD_OPEN) || field.contains(FIELD_CLOSE) {
        return Classification::Invalid;
    }

    let value = field.trim();
    let field_type = if value.is_empty() {
        FieldType::Missing
    } else if value == "0" || value == "1" {
        FieldType::Bool
    } else if is_int(value) {
        FieldType::Int
    } else if is_float(value) {
        FieldType::Float
    } else {
        FieldType::String
    };

    Classification::Typed(field_type)
}

/// Widens two observed types; `Invalid` never reaches here.
pub fn widen(a: FieldType, b: FieldType) -> FieldType {
    a.widen(b)
}

fn strip_sign(value: &str) -> &str {
    value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value)
}

fn all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

fn is_int(value: &str) -> bool {
    all_digits(strip_sign(value))
}

fn is_float(value: &str) -> bool {
    match strip_sign(value).split_once('.') {
        Some((whole, frac)) => all_digits(whole) && all_digits(frac),
        None => false,
    }
}
