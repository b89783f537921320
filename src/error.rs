use thiserror::Error;

pub type HeadgateResult<T> = Result<T, HeadgateError>;

#[derive(Error, Debug)]
pub enum HeadgateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook read error: {0}")]
    Sheet(String),

    #[error("Workbook write error: {0}")]
    Workbook(String),

    #[error("Series store error: {0}")]
    Store(String),

    #[error("Sheet layout error: {0}")]
    Layout(String),

    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    #[error("Row {row} has {found} value cells, item header has {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cannot resolve unit {unit:?} for item '{item}'")]
    UnresolvedUnit { item: String, unit: String },

    #[error("Non-numeric value for item '{item}' at record {row}")]
    NonNumericValue { item: String, row: usize },

    #[error("Item '{item}' not found in {file}")]
    ItemNotFound { file: String, item: String },

    #[error("External id '{0}' missing from the reference table")]
    MissingReferenceEntry(String),
}
