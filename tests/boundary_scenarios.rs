//! End-to-end Query Scenarios
//!
//! Drives the CLI entry point against literal SoR inputs:
//! - byte-range offsets discard the partial first line
//! - the length budget includes a line only if its terminator fits
//! - column types, cell values and missingness as printed
//! - out-of-range queries report their message

use clap::Parser;
use sorer::cli::{execute, Args};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

const THREE_LINES: &str = "<0> <1> <hi>\n<ABCD> <1> <hi>\n<0><asdf><>";

/// Writes `data` to a scratch file and returns what the CLI would print,
/// or the error message it would report.
fn answer(flags: &str, data: &str) -> String {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("temp_test.sor");
    fs::write(&path, data).unwrap();

    let path = path.to_string_lossy().to_string();
    let mut argv = vec!["sorer", "-f", path.as_str()];
    argv.extend(flags.split_whitespace());

    let args = Args::try_parse_from(argv).unwrap();
    match execute(&args) {
        Ok(output) => output,
        Err(e) => e.message(),
    }
}

fn check_all(cases: &[(&str, &str, &str)]) {
    for (idx, (flags, data, expected)) in cases.iter().enumerate() {
        let actual = answer(flags, data);
        assert_eq!(
            actual, *expected,
            "case {} ({} on {:?}): expected {:?}, got {:?}",
            idx, flags, data, expected, actual
        );
    }
}

// =============================================================================
// Byte Offset
// =============================================================================

#[test]
fn test_from_discards_partial_first_line() {
    check_all(&[
        (
            "--from 1 --print_col_type 0",
            "<0> <1> <hi>\n<!^%&*$(#)!> <1> <hi>\n",
            "STRING",
        ),
        (
            "--from 12 --print_col_type 0",
            "<0> <1> <hi>\n<ABCD> <1> <hi>\n",
            "STRING",
        ),
        (
            "--from 11 --print_col_type 0",
            "<0> <1> <hi>\n<ABCD> <1> <hi>\n",
            "STRING",
        ),
    ]);
}

/// An offset just past a newline still discards through the next one.
#[test]
fn test_from_at_line_start_skips_that_line() {
    check_all(&[
        ("--from 13 --print_col_type 0", THREE_LINES, "BOOL"),
        ("--from 16 --print_col_type 0", THREE_LINES, "BOOL"),
    ]);
}

#[test]
fn test_from_past_end_of_file() {
    check_all(&[(
        "--from 100 --print_col_type 0",
        THREE_LINES,
        "From index larger than filesize",
    )]);
}

// =============================================================================
// Byte Length
// =============================================================================

#[test]
fn test_len_excludes_line_without_its_terminator() {
    check_all(&[(
        "--len 12 --print_col_type 0",
        THREE_LINES,
        "Column index out of range",
    )]);
}

#[test]
fn test_len_includes_line_with_its_terminator() {
    check_all(&[
        ("--len 13 --print_col_type 0", THREE_LINES, "BOOL"),
        ("--len 14 --print_col_type 0", THREE_LINES, "BOOL"),
        ("--len 16 --print_col_idx 1 0", THREE_LINES, "1"),
    ]);
}

#[test]
fn test_len_bounds_ingestion_like_sampling() {
    check_all(&[(
        "--len 28 --print_col_idx 0 1",
        THREE_LINES,
        "Offset index out of range",
    )]);
    check_all(&[(
        "--len 29 --print_col_idx 0 1",
        THREE_LINES,
        "\"ABCD\"",
    )]);
}

// =============================================================================
// Column Types
// =============================================================================

#[test]
fn test_print_col_type() {
    let second_row = |field: &str| format!("<0> <1> <hi>\n<{}> <1> <hi>\n", field);

    let cases = [
        ("1", "BOOL"),
        ("-1", "INT"),
        ("-0", "INT"),
        ("+0", "INT"),
        ("10", "INT"),
        ("+10", "INT"),
        ("-10", "INT"),
        ("10.2", "FLOAT"),
        ("+10.2", "FLOAT"),
        ("-10.2", "FLOAT"),
        ("0.2", "FLOAT"),
        (".2", "FLOAT"),
        ("0.", "FLOAT"),
        ("\"hi\"", "STRING"),
        ("asdkfjklasn", "STRING"),
        ("\"           \"", "STRING"),
        ("   \"           \"   ", "STRING"),
        ("\"!@#$%^&*()\"", "STRING"),
        ("!^%&*$(#)!", "STRING"),
    ];

    for (field, expected) in cases {
        assert_eq!(
            answer("--print_col_type 0", &second_row(field)),
            expected,
            "field {:?}",
            field
        );
    }

    check_all(&[("--print_col_type 0", "<0> <0> <hi>\n", "BOOL")]);
}

// =============================================================================
// Missingness
// =============================================================================

#[test]
fn test_is_missing_idx() {
    check_all(&[
        ("--is_missing_idx 0 0", "<>", "1"),
        ("--is_missing_idx 0 0", "<      >", "1"),
        ("--is_missing_idx 2 0", "<0><asdf><>", "1"),
        ("--is_missing_idx 1 0", "<0><asdf><>", "0"),
        ("--is_missing_idx 2 1", "<0><asdf><>\n<><><>", "1"),
        ("--is_missing_idx 0 1", "<>", "Offset index out of range"),
    ]);
}

/// A blank cell under a BOOL column is missing; a `0` in that column is not.
#[test]
fn test_blank_cell_in_typed_column_is_missing() {
    check_all(&[
        ("--is_missing_idx 0 1", "<1>\n<  >\n<0>", "1"),
        ("--is_missing_idx 0 2", "<1>\n<  >\n<0>", "0"),
        ("--print_col_idx 0 1", "<1>\n<  >\n<0>", ""),
    ]);
}

/// A short row leaves its trailing columns missing.
#[test]
fn test_short_row_trailing_columns_missing() {
    check_all(&[("--is_missing_idx 2 1", "<0><asdf><x>\n<1>", "1")]);
}

// =============================================================================
// Cell Values
// =============================================================================

#[test]
fn test_print_col_idx() {
    let row = |first: &str, second: &str, third: &str| {
        format!("<{}><{}><{}><\"asdfasdf   \">", first, second, third)
    };

    let cases = [
        ("--print_col_idx 0 0", row("0", "12.0", "asdf"), "0"),
        ("--print_col_idx 0 0", row("1", "12.0", "asdf"), "1"),
        ("--print_col_idx 0 0", row("1010100", "12.0", "asdf"), "1010100"),
        ("--print_col_idx 0 0", row("+1010100", "12.0", "asdf"), "+1010100"),
        ("--print_col_idx 0 0", row("-1010100", "12.0", "asdf"), "-1010100"),
        ("--print_col_idx 1 0", row("0", "12.0", "asdf"), "12.0"),
        ("--print_col_idx 1 0", row("0", "+12.0", "asdf"), "+12.0"),
        ("--print_col_idx 1 0", row("0", "-12.0", "asdf"), "-12.0"),
        ("--print_col_idx 1 0", row("0", "2.", "asdf"), "2."),
        ("--print_col_idx 1 0", row("0", ".2", "asdf"), ".2"),
        ("--print_col_idx 2 0", row("0", "12.0", "asdf"), "\"asdf\""),
        ("--print_col_idx 2 0", row("0", "12.0", "!@#$%^&*()"), "\"!@#$%^&*()\""),
        ("--print_col_idx 3 0", row("0", "12.0", "asdf"), "\"asdfasdf   \""),
    ];

    for (flags, data, expected) in &cases {
        assert_eq!(answer(flags, data), *expected, "{} on {:?}", flags, data);
    }
}

#[test]
fn test_print_col_idx_missing_and_out_of_range() {
    check_all(&[
        ("--print_col_idx 3 0", "<0><12.0><asdf><>", ""),
        ("--print_col_idx 0 1", "<>", "Offset index out of range"),
        ("--print_col_idx 1 0", "<>", "Column index out of range"),
    ]);
}

// =============================================================================
// Schema Widening Over The Sample
// =============================================================================

#[test]
fn test_schema_widens_over_sample() {
    check_all(&[
        (
            "--print_col_type 0",
            "<0>        <1> <hi>  \n\
             <0>        <1> <hi>  \n\
             <0>        <1> < hi> \n\
             < 0>       <1> <hi>  \n\
             <  \"hey\" > <1> <hi>  \n",
            "STRING",
        ),
        (
            "--print_col_type 1",
            "<0> <1> <hi>\n\
             <0> <1> <hi>\n\
             <0> <1> < hi>\n\
             < 0> < 1> <hi>\n\
             <  \"hey hey hey!\" > <1.> <hi>\n",
            "FLOAT",
        ),
        (
            "--print_col_type 2",
            "<0> <1> <hi>\n\
             <0> <1> <4.4>\n\
             <0> <1> < 2>\n\
             < 0> < 1> <1>\n\
             <  \"hey hey hey!\" > <1.> <hi>\n",
            "STRING",
        ),
        (
            "--print_col_type 3",
            "<0> <1> <hi>\n\
             <0> <1> <4.4> <>\n\
             <0> <1> < 2>\n\
             < 0> < 1> <1> <> \n\
             <  \"hey hey hey!\" > <1.> <hi> <0>\n",
            "BOOL",
        ),
    ]);
}

// =============================================================================
// Input Errors
// =============================================================================

#[test]
fn test_missing_input_file() {
    let args = Args::try_parse_from([
        "sorer",
        "-f",
        "/nonexistent/temp_test.sor",
        "--print_col_type",
        "0",
    ])
    .unwrap();
    let err = execute(&args).unwrap_err();
    assert_eq!(err.message(), "File cannot be opened");
    assert!(err.to_string().contains("SOR_INPUT_FILE_UNAVAILABLE"));
}
