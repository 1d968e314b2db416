//! Validation gate for incoming tracking files
//!
//! Line-count and column-count checks are cheap structural proxies for "the
//! upstream sensor pipeline wrote this file correctly"; they are the only
//! defense against truncated or malformed uploads. A file either passes the
//! gate whole or is rejected whole; there is no partial acceptance.

use crate::parser::{self, RawTable};
use thiserror::Error;

/// Minimum number of lines for a file to be considered at all
pub const MIN_LINES: usize = 4;

/// Column count of the full/dense tracking schema
pub const EXPECTED_COLUMNS: usize = 156;

/// Why a file was rejected by the gate
///
/// Rejections are expected outcomes, not errors: bulk mode quarantines the
/// file and keeps going, incremental mode stops with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("file has {found} lines, need at least {}", MIN_LINES)]
    TooFewLines { found: usize },

    #[error("file has {found} columns, expected {expected}")]
    ColumnCountMismatch { expected: usize, found: usize },

    #[error("rows disagree in field count: row {row} has {found} fields, previous rows had {expected}")]
    RowWidthInconsistent {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Gate a file's content, returning its parsed table only if it is usable
///
/// Checks, in order: the line count (before any field-level parsing), row
/// rectangularity, and the exact column count. Any column count other than
/// [`EXPECTED_COLUMNS`] is rejected, whether too narrow or too wide.
pub fn check_file(content: &str) -> Result<RawTable, RejectReason> {
    let lines = parser::line_count(content);
    if lines < MIN_LINES {
        return Err(RejectReason::TooFewLines { found: lines });
    }

    let table = parser::parse_table(content).map_err(|ragged| RejectReason::RowWidthInconsistent {
        row: ragged.row,
        expected: ragged.expected,
        found: ragged.found,
    })?;

    if table.width() != EXPECTED_COLUMNS {
        return Err(RejectReason::ColumnCountMismatch {
            expected: EXPECTED_COLUMNS,
            found: table.width(),
        });
    }

    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn wide_line(fields: usize) -> String {
        vec!["1.0"; fields].join(" ")
    }

    fn file_of(lines: usize, fields: usize) -> String {
        let mut content = String::new();
        for _ in 0..lines {
            content.push_str(&wide_line(fields));
            content.push('\n');
        }
        content
    }

    #[test]
    fn test_accepts_dense_file() {
        let table = check_file(&file_of(4, EXPECTED_COLUMNS)).unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.width(), EXPECTED_COLUMNS);
    }

    #[test]
    fn test_rejects_three_line_file_before_parsing() {
        // Content is not even field-parseable; the line count check must
        // fire first.
        let err = check_file("a b\nc\n###\n").unwrap_err();
        assert_eq!(err, RejectReason::TooFewLines { found: 3 });
    }

    #[test]
    fn test_rejects_too_narrow_file() {
        let err = check_file(&file_of(4, 10)).unwrap_err();
        assert_eq!(
            err,
            RejectReason::ColumnCountMismatch {
                expected: EXPECTED_COLUMNS,
                found: 10
            }
        );
    }

    #[test]
    fn test_rejects_too_wide_file() {
        let err = check_file(&file_of(4, EXPECTED_COLUMNS + 1)).unwrap_err();
        assert_eq!(
            err,
            RejectReason::ColumnCountMismatch {
                expected: EXPECTED_COLUMNS,
                found: EXPECTED_COLUMNS + 1
            }
        );
    }

    #[test]
    fn test_rejects_ragged_file() {
        let mut content = file_of(3, EXPECTED_COLUMNS);
        content.push_str(&wide_line(EXPECTED_COLUMNS - 2));
        content.push('\n');
        let err = check_file(&content).unwrap_err();
        assert!(matches!(err, RejectReason::RowWidthInconsistent { row: 4, .. }));
    }

    #[test]
    fn test_reject_reasons_render_for_operators() {
        let reason = RejectReason::ColumnCountMismatch {
            expected: EXPECTED_COLUMNS,
            found: 157,
        };
        assert_eq!(reason.to_string(), "file has 157 columns, expected 156");
    }
}
