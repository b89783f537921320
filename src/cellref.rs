//! A1-style cell range addressing.
//!
//! Spreadsheet coordinates are 1-based everywhere in this crate: column `A`
//! is 1, row 1 is the first row. Conversion to the 0-based positions used by
//! the workbook readers happens at the last moment, inside the store modules.

use crate::error::{HeadgateError, HeadgateResult};
use regex::Regex;

/// Highest addressable spreadsheet column (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// A rectangular block of cells, 1-based and inclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min_col: u32,
    pub min_row: u32,
    pub max_col: u32,
    pub max_row: u32,
}

impl CellRange {
    /// Number of columns covered by the range.
    pub fn width(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    /// Number of rows covered by the range.
    pub fn height(&self) -> u32 {
        self.max_row - self.min_row + 1
    }
}

/// Parse a range string like `"B137:EX2788"` into bounds.
///
/// Absolute markers (`$B$137`) are tolerated and ignored. Anything else that
/// does not look like `<col><row>:<col><row>` is an `InvalidRange` error, as
/// is a range whose minimum exceeds its maximum on either axis.
pub fn parse_range(range: &str) -> HeadgateResult<CellRange> {
    let pattern = Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+):\$?([A-Za-z]{1,3})\$?([0-9]+)$")
        .map_err(|e| HeadgateError::InvalidRange(format!("regex error: {}", e)))?;

    let caps = pattern
        .captures(range.trim())
        .ok_or_else(|| HeadgateError::InvalidRange(range.to_string()))?;

    let min_col = column_index_from_letter(&caps[1])?;
    let min_row: u32 = caps[2]
        .parse()
        .map_err(|_| HeadgateError::InvalidRange(range.to_string()))?;
    let max_col = column_index_from_letter(&caps[3])?;
    let max_row: u32 = caps[4]
        .parse()
        .map_err(|_| HeadgateError::InvalidRange(range.to_string()))?;

    if min_row == 0 || min_col > max_col || min_row > max_row {
        return Err(HeadgateError::InvalidRange(range.to_string()));
    }

    Ok(CellRange {
        min_col,
        min_row,
        max_col,
        max_row,
    })
}

/// Convert a column letter to its 1-based index (`A` → 1, `EX` → 154).
pub fn column_index_from_letter(letters: &str) -> HeadgateResult<u32> {
    if letters.is_empty() {
        return Err(HeadgateError::InvalidRange("empty column letter".into()));
    }

    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(HeadgateError::InvalidRange(format!(
                "bad column letter '{}'",
                letters
            )));
        }
        index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if index > MAX_COLUMN {
            return Err(HeadgateError::InvalidRange(format!(
                "column '{}' past sheet end",
                letters
            )));
        }
    }
    Ok(index)
}

/// Convert a 1-based column index back to its letter (1 → `A`, 154 → `EX`).
pub fn letter_from_index(index: u32) -> HeadgateResult<String> {
    if index == 0 || index > MAX_COLUMN {
        return Err(HeadgateError::InvalidRange(format!(
            "column index {} out of range",
            index
        )));
    }

    let mut letters = String::new();
    let mut n = index;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.insert(0, (b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    Ok(letters)
}

/// Derive the closing column of each span from the ordered opening columns.
///
/// Each span ends one column before the next span opens; the last span has no
/// declared end and runs to the end of the sheet. Callers pass from-columns in
/// strictly increasing order (they are collected left to right).
pub fn derive_to_columns(from_columns: &[u32]) -> Vec<Option<u32>> {
    from_columns
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < from_columns.len() {
                Some(from_columns[i + 1] - 1)
            } else {
                None
            }
        })
        .collect()
}
