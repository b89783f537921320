//! Run configuration for the two conversion modes.
//!
//! Every pipeline stage receives its settings through one of these values;
//! nothing reads flags or globals on its own.

use std::path::PathBuf;

/// Settings for a spreadsheet-to-store export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Source workbook path.
    pub workbook: PathBuf,
    /// Sheet holding the data table.
    pub datasheet: String,
    /// Data table range, header rows included (e.g. `B137:EX2788`).
    pub data_range: String,
    /// Sheet holding the node-name/external-id reference table.
    pub refsheet: String,
    /// First data row of the reference table, 1-based.
    pub refrow: u32,
    /// Directory receiving the series containers, created if absent.
    pub outdir: PathBuf,
}

/// Settings for a store-to-workbook rebuild run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Workbook holding the scenario directory and the data sheet.
    pub workbook: PathBuf,
    /// Sheet whose header block locates the scenario and item rows.
    pub datasheet: String,
    /// Header block range on the data sheet (e.g. `A47:BX52`).
    pub header_range: String,
    /// Sheet holding the scenario directory table.
    pub scenario_sheet: String,
    /// Scenario directory range (e.g. `A3:H8`).
    pub scenario_range: String,
    /// Destination workbook, rewritten wholesale each run.
    pub temp_workbook: PathBuf,
}
