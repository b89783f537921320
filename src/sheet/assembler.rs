//! Row-major → column-major transpose.
//!
//! Records arrive one row at a time; the store wants one value vector per
//! item. Column buffers are allocated up front from the header row's column
//! count and the block's record count, then filled record by record. Values
//! stay positionally aligned to the single shared timestamp vector; nothing
//! is interpolated or gap-filled.

use crate::error::{HeadgateError, HeadgateResult};
use crate::sheet::reader::RawTable;
use calamine::Data;
use chrono::NaiveDateTime;

/// One item column lifted out of a data block.
#[derive(Debug, Clone)]
pub struct VariableSeries {
    /// Pipe-delimited item label, `<external_id>|<description>`.
    pub item: String,
    /// Unit string from the block header, brackets already stripped.
    pub unit: String,
    /// Export gate from the block header.
    pub load: bool,
    /// Cell values aligned to the block's timestamp vector.
    pub values: Vec<Data>,
}

impl VariableSeries {
    /// The external id is everything before the first `|`.
    pub fn external_id(&self) -> &str {
        self.item.split('|').next().unwrap_or_default()
    }
}

/// A fully transposed data block.
#[derive(Debug)]
pub struct TransposedBlock {
    /// Shared ascending timestamp sequence, one entry per record row.
    pub timestamps: Vec<NaiveDateTime>,
    /// One series per item column, in sheet order.
    pub series: Vec<VariableSeries>,
}

/// Transpose a raw block into per-item series.
///
/// Every record must produce exactly as many value cells as the item header
/// row; a divergence is a `ColumnCountMismatch` naming the sheet row.
pub fn transpose(table: &RawTable<'_>) -> HeadgateResult<TransposedBlock> {
    let expected = table.item_count();
    let record_hint = table.record_count();

    let mut timestamps = Vec::with_capacity(record_hint);
    let mut columns: Vec<Vec<Data>> = (0..expected)
        .map(|_| Vec::with_capacity(record_hint))
        .collect();

    for record in table.records() {
        let record = record?;
        timestamps.push(record.timestamp);

        let mut produced = 0usize;
        for cell in record.cells {
            if produced < expected {
                columns[produced].push(cell.clone());
            }
            produced += 1;
        }
        if produced != expected {
            return Err(HeadgateError::ColumnCountMismatch {
                row: record.row as usize,
                expected,
                found: produced,
            });
        }
    }

    let series = table
        .items
        .iter()
        .zip(&table.units)
        .zip(&table.load_flags)
        .zip(columns)
        .map(|(((item, unit), load), values)| VariableSeries {
            item: item.clone(),
            unit: unit.clone(),
            load: *load,
            values,
        })
        .collect();

    Ok(TransposedBlock { timestamps, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cellref::parse_range;
    use crate::sheet::reader::TabularReader;
    use calamine::Range;
    use pretty_assertions::assert_eq;

    fn block_sheet() -> Range<Data> {
        let mut sheet = Range::new((0, 0), (8, 4));
        sheet.set_value((0, 0), Data::String("Date".into()));
        sheet.set_value((0, 1), Data::String("[cfs]".into()));
        sheet.set_value((0, 2), Data::String("[cfs]".into()));
        sheet.set_value((0, 3), Data::String("[cfs]".into()));
        sheet.set_value((1, 0), Data::String("key".into()));
        sheet.set_value((1, 1), Data::String("A".into()));
        sheet.set_value((1, 2), Data::String("B".into()));
        sheet.set_value((1, 3), Data::String("C".into()));
        for col in 1..=3 {
            sheet.set_value((2, col), Data::Bool(true));
        }
        sheet.set_value((3, 0), Data::String("2021-01-01 00:00:00".into()));
        sheet.set_value((3, 1), Data::Int(1));
        sheet.set_value((3, 2), Data::Int(2));
        sheet.set_value((3, 3), Data::Int(3));
        sheet.set_value((4, 0), Data::String("2021-01-02 00:00:00".into()));
        sheet.set_value((4, 1), Data::Int(4));
        sheet.set_value((4, 2), Data::Int(5));
        sheet.set_value((4, 3), Data::Int(6));
        sheet
    }

    #[test]
    fn test_transpose_column_extraction() {
        let sheet = block_sheet();
        let table = TabularReader::new(&sheet)
            .read_block(&parse_range("A1:D5").unwrap())
            .unwrap();
        let block = transpose(&table).unwrap();

        assert_eq!(block.timestamps.len(), 2);
        assert_eq!(block.series.len(), 3);

        // Header ["A","B","C"], rows (t1,1,2,3) and (t2,4,5,6): column "B"
        // must come out as [2, 5].
        let b = &block.series[1];
        assert_eq!(b.item, "B");
        assert_eq!(b.values, vec![Data::Int(2), Data::Int(5)]);
    }

    #[test]
    fn test_transpose_preserves_empty_cells() {
        let mut sheet = block_sheet();
        sheet.set_value((4, 2), Data::Empty);
        let table = TabularReader::new(&sheet)
            .read_block(&parse_range("A1:D5").unwrap())
            .unwrap();
        let block = transpose(&table).unwrap();
        assert_eq!(block.series[1].values, vec![Data::Int(2), Data::Empty]);
    }

    #[test]
    fn test_transpose_detects_ragged_rows() {
        let sheet = block_sheet();
        let reader = TabularReader::new(&sheet);
        let mut table = reader.read_block(&parse_range("A1:D5").unwrap()).unwrap();
        // Drop one item from the header: every record now produces one cell
        // too many.
        table.items.pop();
        table.units.pop();
        table.load_flags.pop();

        match transpose(&table).unwrap_err() {
            HeadgateError::ColumnCountMismatch {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 4);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected ColumnCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_transpose_propagates_record_errors() {
        let mut sheet = block_sheet();
        sheet.set_value((4, 0), Data::Empty);
        let table = TabularReader::new(&sheet)
            .read_block(&parse_range("A1:D5").unwrap())
            .unwrap();
        assert!(matches!(
            transpose(&table),
            Err(HeadgateError::Layout(_))
        ));
    }

    #[test]
    fn test_external_id_split() {
        let series = VariableSeries {
            item: "123|Return Flow".into(),
            unit: String::new(),
            load: true,
            values: vec![],
        };
        assert_eq!(series.external_id(), "123");

        let no_pipe = VariableSeries {
            item: "plain".into(),
            unit: String::new(),
            load: true,
            values: vec![],
        };
        assert_eq!(no_pipe.external_id(), "plain");
    }
}
