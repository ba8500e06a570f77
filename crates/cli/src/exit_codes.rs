//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                 |
//! |------|---------------------------------------------------------|
//! | 0    | Success                                                 |
//! | 1    | General error (unspecified)                             |
//! | 2    | CLI usage error (bad args, bad flag combinations)       |
//! | 3    | Config rejected (TOML parse or validation failure)      |
//! | 4    | Data error (malformed CSV, missing header fields)       |
//! | 5    | IO error (unreadable input, unwritable output)          |
//! | 6    | Render error (SVG backend failure)                      |
//! | 7    | Partial failure (some years failed in a multi-year run) |
//!
//! When adding a code: add the constant, document what triggers it, and
//! update the table above.

use gdpmap_engine::MapError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid flag combinations.
pub const EXIT_USAGE: u8 = 2;

/// Config file did not parse, or parsed but failed validation.
pub const EXIT_CONFIG: u8 = 3;

/// Input data is malformed: ragged CSV rows, missing header fields.
pub const EXIT_DATA: u8 = 4;

/// Reading an input file or writing an output file failed.
pub const EXIT_IO: u8 = 5;

/// The SVG renderer reported a failure.
pub const EXIT_RENDER: u8 = 6;

/// A multi-year render finished with at least one failed year.
pub const EXIT_PARTIAL: u8 = 7;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &MapError) -> u8 {
    match err {
        MapError::ConfigParse(_) | MapError::ConfigValidation(_) => EXIT_CONFIG,
        MapError::MissingField { .. } | MapError::Csv(_) => EXIT_DATA,
        MapError::Io(_) => EXIT_IO,
    }
}
