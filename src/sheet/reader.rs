//! Data-block extraction.
//!
//! A data block is a rectangular cell range with three reserved header rows
//! (unit strings, item names, load flags) above timestamp-keyed records. The
//! first column of the block is the record key column; it is skipped in every
//! header row.
//!
//! `read_block` materializes only the three header rows. Records stay in the
//! backing sheet until the transpose walks them, one cell at a time, so the
//! block is never held in memory twice.

use crate::cellref::CellRange;
use crate::error::{HeadgateError, HeadgateResult};
use crate::sheet::cells::{cell_string, cell_timestamp, cell_truthy, EMPTY_CELL};
use calamine::{Data, Range};
use chrono::NaiveDateTime;
use tracing::debug;

/// Header rows reserved at the top of every data block.
const HEADER_ROWS: u32 = 3;

/// Reads raw data blocks out of a worksheet range.
pub struct TabularReader<'a> {
    sheet: &'a Range<Data>,
}

impl<'a> TabularReader<'a> {
    pub fn new(sheet: &'a Range<Data>) -> Self {
        Self { sheet }
    }

    /// Extract the block at `block`, classifying the three header rows.
    pub fn read_block(&self, block: &CellRange) -> HeadgateResult<RawTable<'a>> {
        if block.height() < HEADER_ROWS {
            return Err(HeadgateError::Layout(format!(
                "data range needs {} header rows, got {} rows total",
                HEADER_ROWS,
                block.height()
            )));
        }
        if block.width() < 2 {
            return Err(HeadgateError::Layout(
                "data range needs a key column and at least one item column".into(),
            ));
        }

        let value_cols = || block.min_col + 1..=block.max_col;

        // Row 0: unit strings, stripped of brackets and whitespace.
        let units: Vec<String> = value_cols()
            .map(|col| {
                let cell = self.cell(block.min_row, col);
                cell_string(cell)
                    .map(|s| s.trim().trim_matches(|c| c == '[' || c == ']').trim().to_string())
                    .unwrap_or_default()
            })
            .collect();

        // Row 1: item names, verbatim.
        let items: Vec<String> = value_cols()
            .map(|col| cell_string(self.cell(block.min_row + 1, col)).unwrap_or_default())
            .collect();

        // Row 2: load flags.
        let load_flags: Vec<bool> = value_cols()
            .map(|col| cell_truthy(self.cell(block.min_row + 2, col)))
            .collect();

        debug!(
            items = items.len(),
            records = block.height() - HEADER_ROWS,
            "read data block"
        );

        Ok(RawTable {
            sheet: self.sheet,
            block: *block,
            units,
            items,
            load_flags,
        })
    }

    fn cell(&self, row: u32, col: u32) -> &'a Data {
        self.sheet.get_value((row - 1, col - 1)).unwrap_or(&EMPTY_CELL)
    }
}

/// A data block with parsed headers and lazily walked records.
#[derive(Debug)]
pub struct RawTable<'a> {
    pub(crate) sheet: &'a Range<Data>,
    pub(crate) block: CellRange,
    /// Unit string per item column, brackets stripped.
    pub units: Vec<String>,
    /// Item name per column, untransformed.
    pub items: Vec<String>,
    /// Load flag per column.
    pub load_flags: Vec<bool>,
}

impl<'a> RawTable<'a> {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of record rows below the headers.
    pub fn record_count(&self) -> usize {
        (self.block.height() - HEADER_ROWS) as usize
    }

    /// Iterate the record rows in sheet order.
    pub fn records(&self) -> Records<'a> {
        Records {
            sheet: self.sheet,
            block: self.block,
            next_row: self.block.min_row + HEADER_ROWS,
        }
    }
}

/// Iterator over the record rows of a block.
pub struct Records<'a> {
    sheet: &'a Range<Data>,
    block: CellRange,
    next_row: u32,
}

impl<'a> Iterator for Records<'a> {
    type Item = HeadgateResult<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row > self.block.max_row {
            return None;
        }
        let row = self.next_row;
        self.next_row += 1;

        let key = self
            .sheet
            .get_value((row - 1, self.block.min_col - 1))
            .unwrap_or(&EMPTY_CELL);
        let timestamp = match cell_timestamp(key, row) {
            Ok(ts) => ts,
            Err(e) => return Some(Err(e)),
        };

        Some(Ok(Record {
            row,
            timestamp,
            cells: Cells {
                sheet: self.sheet,
                row,
                col: self.block.min_col + 1,
                end: self.block.max_col,
            },
        }))
    }
}

/// One record row: its key timestamp plus a lazy walk of the value cells.
pub struct Record<'a> {
    /// 1-based sheet row, for error reporting.
    pub row: u32,
    pub timestamp: NaiveDateTime,
    pub cells: Cells<'a>,
}

/// Lazy left-to-right walk over a record's value cells.
pub struct Cells<'a> {
    sheet: &'a Range<Data>,
    row: u32,
    col: u32,
    end: u32,
}

impl<'a> Iterator for Cells<'a> {
    type Item = &'a Data;

    fn next(&mut self) -> Option<&'a Data> {
        if self.col > self.end {
            return None;
        }
        let cell = self
            .sheet
            .get_value((self.row - 1, self.col - 1))
            .unwrap_or(&EMPTY_CELL);
        self.col += 1;
        Some(cell)
    }
}
