//! Spreadsheet-side parsing: cell coercion, block extraction, and the
//! row-major → column-major transpose.

mod assembler;
pub mod cells;
mod reader;

pub use assembler::{transpose, TransposedBlock, VariableSeries};
pub use reader::{Cells, RawTable, Record, Records, TabularReader};
