//! Headgate - basin model series conversion
//!
//! This library moves hydrologic model data between two representations: a
//! tabular workbook layout (nodes and variables as columns, time as rows)
//! and per-node ts0 series containers, one tagged time series per file.
//!
//! # Features
//!
//! - Cell range addressing with exact letter/index conversion
//! - Header-aware data table reading with lazy record traversal
//! - Row-major to column-major transposition on pre-sized buffers
//! - Physical type and unit resolution for flow and return-flow items
//! - Scenario directory resolution into column spans and item lists
//! - Append-order workbook rebuilds, one sheet per scenario
//!
//! # Example
//!
//! ```no_run
//! use headgate::cli::export;
//! use headgate::config::ExportConfig;
//! use std::path::PathBuf;
//!
//! let config = ExportConfig {
//!     workbook: PathBuf::from("basin.xlsx"),
//!     datasheet: "BC1 Data".to_string(),
//!     data_range: "B137:EX2788".to_string(),
//!     refsheet: "Reference".to_string(),
//!     refrow: 10,
//!     outdir: PathBuf::from("data"),
//! };
//! export(&config)?;
//! # Ok::<(), headgate::error::HeadgateError>(())
//! ```

pub mod cellref;
pub mod cli;
pub mod config;
pub mod error;
pub mod reference;
pub mod scenario;
pub mod sheet;
pub mod store;
pub mod units;
pub mod workbook;

// Re-export commonly used types
pub use error::{HeadgateError, HeadgateResult};
pub use scenario::{ColumnSpan, ScenarioSpec};
pub use store::{LoadedSeries, SeriesItem};
pub use units::{PhysicalType, PhysicalUnit, Resolution};
