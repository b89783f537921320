//! Scenario directory resolution.
//!
//! A workbook rebuild is driven by two loosely structured tables. The
//! scenario directory (usually on the Master sheet) lists one scenario per
//! row: name, results file, assorted run settings, and a load flag in the
//! last column. The data sheet's header block names the rows that carry the
//! `Scenario` and `Item Name` labels; the full `Scenario` row then gives
//! each scenario's first column, and consecutive entries bound each other's
//! spans. The last span runs open-ended to the sheet's last used column.

use crate::cellref::{derive_to_columns, CellRange};
use crate::error::{HeadgateError, HeadgateResult};
use crate::sheet::cells::{cell_string, cell_truthy, trimmed_string, EMPTY_CELL};
use calamine::{Data, Range};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Label marking the row of scenario column starts. The same literal heads
/// the directory table, so directory rows carrying it are skipped.
const SCENARIO_LABEL: &str = "Scenario";

/// Label marking the row of item names on the data sheet.
const ITEM_LABEL: &str = "Item Name";

/// Pipe-prefix marking a reserved, unused item column.
const UNUSED_ITEM_PREFIX: &str = "0";

/// One scenario's column block on the data sheet, 1-based and inclusive.
/// An unset end runs to the sheet's last used column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub from: u32,
    pub to: Option<u32>,
}

/// A fully resolved scenario directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    pub name: String,
    /// Results container holding this scenario's series.
    pub source: PathBuf,
    pub load: bool,
    pub span: ColumnSpan,
    /// Item names inside the span, in column order, reserved columns dropped.
    pub items: Vec<String>,
}

/// Resolves the scenario directory against the data sheet's header block.
pub struct ScenarioResolver<'a> {
    directory_sheet: &'a Range<Data>,
    data_sheet: &'a Range<Data>,
}

impl<'a> ScenarioResolver<'a> {
    pub fn new(directory_sheet: &'a Range<Data>, data_sheet: &'a Range<Data>) -> Self {
        ScenarioResolver {
            directory_sheet,
            data_sheet,
        }
    }

    /// Resolve every listed scenario to its source file, column span, and
    /// item list, in directory row order.
    pub fn resolve(
        &self,
        directory_block: &CellRange,
        header_block: &CellRange,
    ) -> HeadgateResult<Vec<ScenarioSpec>> {
        let directory = self.directory(directory_block);
        let (scenario_row, item_row) = self.label_rows(header_block)?;
        let (labels, from_columns) = self.scenario_columns(scenario_row);
        let to_columns = derive_to_columns(&from_columns);

        let mut specs = Vec::with_capacity(directory.len());
        for entry in directory {
            let idx = labels
                .iter()
                .position(|label| *label == entry.name)
                .ok_or_else(|| {
                    HeadgateError::Layout(format!(
                        "scenario '{}' has no column on row {} of the data sheet",
                        entry.name, scenario_row
                    ))
                })?;
            let span = ColumnSpan {
                from: from_columns[idx],
                to: to_columns[idx],
            };
            let items = self.span_items(item_row, span);
            debug!(
                scenario = %entry.name,
                from = span.from,
                to = ?span.to,
                items = items.len(),
                "resolved scenario"
            );
            specs.push(ScenarioSpec {
                name: entry.name,
                source: PathBuf::from(entry.source),
                load: entry.load,
                span,
                items,
            });
        }
        Ok(specs)
    }

    /// Collect directory rows. The name sits in the block's first column,
    /// the source file in the second, the load flag in the last. Header
    /// rows and rows without a source file are skipped.
    fn directory(&self, block: &CellRange) -> Vec<DirectoryEntry> {
        let mut entries = Vec::new();
        for row in block.min_row..=block.max_row {
            let Some(name) = trimmed_string(self.directory_cell(row, block.min_col)) else {
                continue;
            };
            if name == SCENARIO_LABEL {
                continue;
            }
            let Some(source) = trimmed_string(self.directory_cell(row, block.min_col + 1)) else {
                continue;
            };
            let load = cell_truthy(self.directory_cell(row, block.max_col));
            entries.push(DirectoryEntry { name, source, load });
        }
        entries
    }

    /// Row numbers of the `Scenario` and `Item Name` labels, read from the
    /// first column of the header block.
    fn label_rows(&self, block: &CellRange) -> HeadgateResult<(u32, u32)> {
        let mut rows = HashMap::new();
        for row in block.min_row..=block.max_row {
            if let Some(label) = trimmed_string(self.data_cell(row, block.min_col)) {
                rows.insert(label, row);
            }
        }
        let find = |label: &str| {
            rows.get(label).copied().ok_or_else(|| {
                HeadgateError::Layout(format!(
                    "header range column has no '{}' label",
                    label
                ))
            })
        };
        Ok((find(SCENARIO_LABEL)?, find(ITEM_LABEL)?))
    }

    /// Non-empty cells of the full scenario row, left to right. The label
    /// cell itself lands in the list too; it bounds the first real span and
    /// never matches a directory entry.
    fn scenario_columns(&self, scenario_row: u32) -> (Vec<String>, Vec<u32>) {
        let mut labels = Vec::new();
        let mut columns = Vec::new();
        for col in 1..=self.last_column() {
            if let Some(label) = trimmed_string(self.data_cell(scenario_row, col)) {
                labels.push(label);
                columns.push(col);
            }
        }
        (labels, columns)
    }

    /// Item names between the span bounds, skipping blanks and reserved
    /// columns.
    fn span_items(&self, item_row: u32, span: ColumnSpan) -> Vec<String> {
        let last = span.to.unwrap_or_else(|| self.last_column());
        let mut items = Vec::new();
        for col in span.from..=last {
            let Some(item) = cell_string(self.data_cell(item_row, col)) else {
                continue;
            };
            if item.split('|').next() == Some(UNUSED_ITEM_PREFIX) {
                continue;
            }
            items.push(item);
        }
        items
    }

    fn last_column(&self) -> u32 {
        self.data_sheet.end().map(|(_, col)| col + 1).unwrap_or(0)
    }

    fn directory_cell(&self, row: u32, col: u32) -> &Data {
        self.directory_sheet
            .get_value((row - 1, col - 1))
            .unwrap_or(&EMPTY_CELL)
    }

    fn data_cell(&self, row: u32, col: u32) -> &Data {
        self.data_sheet
            .get_value((row - 1, col - 1))
            .unwrap_or(&EMPTY_CELL)
    }
}

struct DirectoryEntry {
    name: String,
    source: String,
    load: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cellref::parse_range;
    use pretty_assertions::assert_eq;

    /// Directory block A3:C7 on the master sheet: header row, three
    /// scenarios, one blank row.
    fn master_sheet() -> Range<Data> {
        let mut sheet = Range::new((0, 0), (8, 4));
        sheet.set_value((2, 0), Data::String("Scenario".into()));
        sheet.set_value((2, 1), Data::String("File".into()));
        sheet.set_value((2, 2), Data::String("Load".into()));
        sheet.set_value((3, 0), Data::String("Base".into()));
        sheet.set_value((3, 1), Data::String("base.ts0".into()));
        sheet.set_value((3, 2), Data::Int(1));
        sheet.set_value((4, 0), Data::String("Wet".into()));
        sheet.set_value((4, 1), Data::String("wet.ts0".into()));
        sheet.set_value((4, 2), Data::Int(0));
        sheet.set_value((5, 0), Data::String("Future".into()));
        sheet.set_value((5, 1), Data::String("future.ts0".into()));
        sheet.set_value((5, 2), Data::Bool(true));
        sheet
    }

    /// Data sheet with a header block at A10:A12. Row 10 carries the
    /// scenario starts (Base at C, Wet at F, Future at I); row 12 carries
    /// item names through the last used column J.
    fn data_sheet() -> Range<Data> {
        let mut sheet = Range::new((0, 0), (12, 9));
        sheet.set_value((9, 0), Data::String("Scenario".into()));
        sheet.set_value((11, 0), Data::String("Item Name".into()));

        sheet.set_value((9, 2), Data::String("Base".into()));
        sheet.set_value((9, 5), Data::String("Wet".into()));
        sheet.set_value((9, 8), Data::String("Future".into()));

        sheet.set_value((11, 2), Data::String("123|Flow".into()));
        sheet.set_value((11, 3), Data::String("0|Spare".into()));
        sheet.set_value((11, 4), Data::String("456|Flow".into()));
        sheet.set_value((11, 5), Data::String("789|Flow".into()));
        // G blank on the item row.
        sheet.set_value((11, 7), Data::String("789|Return".into()));
        sheet.set_value((11, 8), Data::String("900|Flow".into()));
        sheet.set_value((11, 9), Data::String("901|Flow".into()));
        sheet
    }

    fn resolve_fixture() -> Vec<ScenarioSpec> {
        let master = master_sheet();
        let data = data_sheet();
        ScenarioResolver::new(&master, &data)
            .resolve(
                &parse_range("A3:C7").unwrap(),
                &parse_range("A10:A12").unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_directory_skips_header_and_blank_rows() {
        let specs = resolve_fixture();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Wet", "Future"]);
        assert_eq!(specs[0].source, PathBuf::from("base.ts0"));
    }

    #[test]
    fn test_load_flags_are_captured() {
        let specs = resolve_fixture();
        assert!(specs[0].load);
        assert!(!specs[1].load);
        assert!(specs[2].load);
    }

    #[test]
    fn test_spans_bound_each_other() {
        let specs = resolve_fixture();
        assert_eq!(specs[0].span, ColumnSpan { from: 3, to: Some(5) });
        assert_eq!(specs[1].span, ColumnSpan { from: 6, to: Some(8) });
        // The rightmost scenario runs to the end of the sheet.
        assert_eq!(specs[2].span, ColumnSpan { from: 9, to: None });
    }

    #[test]
    fn test_items_respect_span_and_exclusions() {
        let specs = resolve_fixture();
        // D holds a reserved 0| column, dropped from Base.
        assert_eq!(specs[0].items, vec!["123|Flow", "456|Flow"]);
        // G is blank on the item row, skipped without complaint.
        assert_eq!(specs[1].items, vec!["789|Flow", "789|Return"]);
        // Open span picks up everything through column J.
        assert_eq!(specs[2].items, vec!["900|Flow", "901|Flow"]);
    }

    #[test]
    fn test_single_scenario_directory() {
        let mut master: Range<Data> = Range::new((0, 0), (3, 3));
        master.set_value((0, 0), Data::String("Scenario".into()));
        master.set_value((0, 1), Data::String("File".into()));
        master.set_value((0, 2), Data::String("Load".into()));
        master.set_value((1, 0), Data::String("Base".into()));
        master.set_value((1, 1), Data::String("base.res".into()));
        master.set_value((1, 2), Data::Int(1));
        // Third row left entirely blank.
        let data = data_sheet();

        let specs = ScenarioResolver::new(&master, &data)
            .resolve(
                &parse_range("A1:C3").unwrap(),
                &parse_range("A10:A12").unwrap(),
            )
            .unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "Base");
    }

    #[test]
    fn test_scenario_without_column_is_a_layout_error() {
        let mut master = master_sheet();
        master.set_value((6, 0), Data::String("Ghost".into()));
        master.set_value((6, 1), Data::String("ghost.ts0".into()));
        master.set_value((6, 2), Data::Int(1));
        let data = data_sheet();

        let err = ScenarioResolver::new(&master, &data)
            .resolve(
                &parse_range("A3:C7").unwrap(),
                &parse_range("A10:A12").unwrap(),
            )
            .unwrap_err();
        match err {
            HeadgateError::Layout(msg) => assert!(msg.contains("Ghost")),
            other => panic!("expected Layout, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_label_is_a_layout_error() {
        let master = master_sheet();
        let mut data = data_sheet();
        data.set_value((11, 0), Data::String("Wrong Label".into()));

        let err = ScenarioResolver::new(&master, &data)
            .resolve(
                &parse_range("A3:C7").unwrap(),
                &parse_range("A10:A12").unwrap(),
            )
            .unwrap_err();
        match err {
            HeadgateError::Layout(msg) => assert!(msg.contains("Item Name")),
            other => panic!("expected Layout, got {:?}", other),
        }
    }
}
