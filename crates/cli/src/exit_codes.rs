//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | input            | Registry / retailer catalog loading      |
//! | 10-19   | config           | Match policy discovery and validation    |
//! | 20-29   | output           | Result files and reports                 |
//! | 30-39   | check-urls       | Registry website checks                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use vinvegan_io::IoError;
use vinvegan_match::MatchError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-9)
// =============================================================================

/// Input file missing or unreadable.
pub const EXIT_INPUT_READ: u8 = 3;

/// Registry JSON (or a result file) has the wrong shape.
pub const EXIT_INPUT_JSON: u8 = 4;

/// Retailer CSV lacks a configured column, has a malformed row, or the
/// configured delimiter is unusable.
pub const EXIT_INPUT_CSV: u8 = 5;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Policy file failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 10;

/// Policy file given with --config does not exist.
pub const EXIT_CONFIG_NOT_FOUND: u8 = 11;

// =============================================================================
// Output (20-29)
// =============================================================================

/// Result file or report could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 20;

// =============================================================================
// check-urls (30-39)
// =============================================================================

/// At least one registry website is missing or unreachable (--strict only).
pub const EXIT_URLS_BROKEN: u8 = 30;

// =============================================================================
// Error mapping
// =============================================================================

/// Map an IoError to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } => EXIT_INPUT_READ,
        IoError::Write { .. } => EXIT_OUTPUT_WRITE,
        IoError::Json { .. } => EXIT_INPUT_JSON,
        IoError::MissingColumn { .. } | IoError::MalformedRow { .. } | IoError::Delimiter(_) => {
            EXIT_INPUT_CSV
        }
    }
}

/// Map a MatchError to its exit code. Every engine error is a policy problem.
pub fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::ConfigParse(_)
        | MatchError::ConfigValidation(_)
        | MatchError::ThresholdRange { .. }
        | MatchError::AbbreviationChain { .. } => EXIT_CONFIG_INVALID,
        MatchError::ConfigSerialize(_) => EXIT_OUTPUT_WRITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn io_errors_map_by_kind() {
        let path = PathBuf::from("x");
        let read = IoError::Read { path: path.clone(), source: std::io::Error::other("gone") };
        assert_eq!(io_exit_code(&read), EXIT_INPUT_READ);
        let column = IoError::MissingColumn { path: path.clone(), column: "Produsent".into() };
        assert_eq!(io_exit_code(&column), EXIT_INPUT_CSV);
        let row = IoError::MalformedRow { path, line: 4, message: "short".into() };
        assert_eq!(io_exit_code(&row), EXIT_INPUT_CSV);
        assert_eq!(io_exit_code(&IoError::Delimiter('¦')), EXIT_INPUT_CSV);
    }

    #[test]
    fn match_errors_map_by_kind() {
        let parse = MatchError::ConfigParse("expected '='".into());
        assert_eq!(match_exit_code(&parse), EXIT_CONFIG_INVALID);
        let range = MatchError::ThresholdRange { name: "base_similarity", value: 85.0 };
        assert_eq!(match_exit_code(&range), EXIT_CONFIG_INVALID);
        let serialize = MatchError::ConfigSerialize("unsupported value".into());
        assert_eq!(match_exit_code(&serialize), EXIT_OUTPUT_WRITE);
        assert_eq!(serialize.to_string(), "config serialize error: unsupported value");
    }

    #[test]
    fn codes_are_unique() {
        let codes = [
            EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_INPUT_READ, EXIT_INPUT_JSON, EXIT_INPUT_CSV,
            EXIT_CONFIG_INVALID, EXIT_CONFIG_NOT_FOUND, EXIT_OUTPUT_WRITE, EXIT_URLS_BROKEN,
        ];
        let unique: std::collections::BTreeSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
