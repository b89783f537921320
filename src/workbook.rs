//! Destination workbook assembly.
//!
//! Rebuilt scenarios land in a fresh workbook, one sheet per scenario.
//! Sheets are written in constant-memory mode, strictly in append order:
//! a header row of item names, then one row per timestep. Large runs never
//! hold a full sheet in memory.

use crate::error::{HeadgateError, HeadgateResult};
use crate::store::LoadedSeries;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

/// Timestamp format used for the row-key column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the destination workbook sheet by sheet.
pub struct WorkbookAssembler {
    workbook: Workbook,
    sheets: usize,
}

impl WorkbookAssembler {
    pub fn new() -> Self {
        WorkbookAssembler {
            workbook: Workbook::new(),
            sheets: 0,
        }
    }

    /// Append one scenario as a sheet named after it.
    ///
    /// Row 1 leaves the key cell blank and lists item names in series
    /// order; each following row holds the timestamp and the aligned
    /// values.
    pub fn append_scenario(&mut self, name: &str, series: &LoadedSeries) -> HeadgateResult<()> {
        let worksheet = self.workbook.add_worksheet_with_constant_memory();
        worksheet
            .set_name(name)
            .map_err(|e| HeadgateError::Workbook(format!("invalid sheet name '{}': {}", name, e)))?;

        for (idx, item) in series.items.iter().enumerate() {
            worksheet
                .write_string(0, (idx + 1) as u16, &item.name)
                .map_err(|e| HeadgateError::Workbook(format!("failed to write header: {}", e)))?;
        }

        for (step, timestamp) in series.timestamps.iter().enumerate() {
            let row = (step + 1) as u32;
            worksheet
                .write_string(row, 0, &timestamp.format(TIMESTAMP_FORMAT).to_string())
                .map_err(|e| {
                    HeadgateError::Workbook(format!("failed to write timestamp: {}", e))
                })?;
            for (idx, column) in series.columns.iter().enumerate() {
                worksheet
                    .write_number(row, (idx + 1) as u16, column[step])
                    .map_err(|e| {
                        HeadgateError::Workbook(format!("failed to write value: {}", e))
                    })?;
            }
        }

        debug!(
            sheet = name,
            items = series.items.len(),
            steps = series.timestamps.len(),
            "appended scenario sheet"
        );
        self.sheets += 1;
        Ok(())
    }

    /// Number of sheets appended so far.
    pub fn sheet_count(&self) -> usize {
        self.sheets
    }

    /// Write the workbook, replacing any existing file at `path`.
    pub fn save(mut self, path: &Path) -> HeadgateResult<()> {
        self.workbook
            .save(path)
            .map_err(|e| HeadgateError::Workbook(format!("failed to save workbook: {}", e)))?;
        Ok(())
    }
}

impl Default for WorkbookAssembler {
    fn default() -> Self {
        Self::new()
    }
}
