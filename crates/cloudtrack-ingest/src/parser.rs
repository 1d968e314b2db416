//! Record parser for raw tracking files
//!
//! Splits a file into lines and each line into whitespace-delimited fields,
//! producing a rectangular table of raw string cells. Rows that disagree in
//! field count signal a corrupt or concatenated source file and fail the
//! whole file; rows are never padded or truncated to fit.

use thiserror::Error;

/// Rows in the file disagree in field count
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row} has {found} fields, previous rows had {expected}")]
pub struct RaggedRows {
    /// 1-based line number of the first offending row
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// Rectangular table of raw fields read from one file
///
/// Every row is guaranteed to have exactly [`width`](RawTable::width) fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl RawTable {
    /// Field count shared by every row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Count the lines of a file's content
///
/// Line endings do not matter; blank lines count. Used by the validation
/// gate before any field-level parsing happens.
pub fn line_count(content: &str) -> usize {
    content.lines().count()
}

/// Parse file content into a rectangular [`RawTable`]
///
/// Lines are split on ASCII whitespace, so `\n` vs `\r\n` endings and runs
/// of spaces are irrelevant to the resulting width. Blank lines are skipped.
pub fn parse_table(content: &str) -> Result<RawTable, RaggedRows> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut width = 0usize;

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<String> = line.split_whitespace().map(str::to_owned).collect();

        if rows.is_empty() {
            width = fields.len();
        } else if fields.len() != width {
            return Err(RaggedRows {
                row: index + 1,
                expected: width,
                found: fields.len(),
            });
        }

        rows.push(fields);
    }

    Ok(RawTable { rows, width })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rectangular_table() {
        let table = parse_table("1 2 3\n4 5 6\n7 8 9\n").unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse_table("1 2 3\n4 5\n").unwrap_err();
        assert_eq!(
            err,
            RaggedRows {
                row: 2,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_line_endings_do_not_change_width() {
        let unix = parse_table("1 2\n3 4\n").unwrap();
        let dos = parse_table("1 2\r\n3 4\r\n").unwrap();
        assert_eq!(unix, dos);
    }

    #[test]
    fn test_repeated_whitespace_collapses() {
        let table = parse_table("1   2\t3\n").unwrap();
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse_table("1 2\n\n3 4\n").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_empty_content() {
        let table = parse_table("").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.width(), 0);
    }

    #[test]
    fn test_line_count_includes_blank_lines() {
        assert_eq!(line_count("a\n\nb\n"), 3);
        assert_eq!(line_count(""), 0);
    }
}
