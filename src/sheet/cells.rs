//! Coercion rules for individual spreadsheet cells.
//!
//! Workbooks produced by the basin model are loosely typed: ids arrive as
//! numbers or text, load flags as native booleans or 0/1, timestamps as
//! native datetimes, ISO strings, or raw serial numbers. These helpers fold
//! that mess into the crate's types in one place.

use crate::error::{HeadgateError, HeadgateResult};
use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Stand-in for positions outside a sheet's used range.
pub(crate) static EMPTY_CELL: Data = Data::Empty;

/// Excel serial day 0 (the 1900 date system with its leap-year quirk).
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap()
}

/// Render a cell as display text. Empty cells and error cells yield `None`.
///
/// Integral floats drop their `.0` so numeric ids match their text spelling.
pub fn cell_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.is_empty() => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `cell_string` with surrounding whitespace removed. Whitespace-only text
/// yields `None`.
pub fn trimmed_string(cell: &Data) -> Option<String> {
    cell_string(cell)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Interpret a load-flag cell. Empty cells count as off.
pub fn cell_truthy(cell: &Data) -> bool {
    match cell {
        Data::Bool(b) => *b,
        Data::Int(i) => *i != 0,
        Data::Float(f) => *f != 0.0,
        Data::String(s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "y")
        }
        _ => false,
    }
}

/// Parse a record-key cell into a timestamp.
///
/// `row` is the 1-based spreadsheet row, used only for error text.
pub fn cell_timestamp(cell: &Data, row: u32) -> HeadgateResult<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().ok_or_else(|| {
            HeadgateError::Layout(format!("unrepresentable datetime at row {}", row))
        }),
        Data::DateTimeIso(s) => parse_timestamp_text(s, row),
        Data::String(s) => parse_timestamp_text(s, row),
        Data::Float(f) => serial_to_datetime(*f, row),
        Data::Int(i) => serial_to_datetime(*i as f64, row),
        Data::Empty => Err(HeadgateError::Layout(format!(
            "empty timestamp cell at row {}",
            row
        ))),
        other => Err(HeadgateError::Layout(format!(
            "expected timestamp at row {}, got {:?}",
            row, other
        ))),
    }
}

fn parse_timestamp_text(s: &str, row: u32) -> HeadgateResult<NaiveDateTime> {
    let trimmed = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap());
    }
    Err(HeadgateError::Layout(format!(
        "cannot parse timestamp '{}' at row {}",
        trimmed, row
    )))
}

fn serial_to_datetime(serial: f64, row: u32) -> HeadgateResult<NaiveDateTime> {
    // 2958465 is 9999-12-31, the last date a workbook can hold.
    if !serial.is_finite() || !(0.0..=2_958_465.0).contains(&serial) {
        return Err(HeadgateError::Layout(format!(
            "serial date {} at row {} out of range",
            serial, row
        )));
    }
    let days = serial.trunc() as i64;
    let secs = (serial.fract() * 86_400.0).round() as i64;
    let date = serial_epoch() + Duration::days(days);
    Ok(date.and_hms_opt(0, 0, 0).unwrap() + Duration::seconds(secs))
}
