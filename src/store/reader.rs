//! Series container reading.

use crate::error::{HeadgateError, HeadgateResult};
use crate::store::{read_bytes, read_f64, read_i64, read_string, read_u16, read_u32};
use crate::store::{SeriesItem, FORMAT_VERSION, MAGIC};
use crate::units::{PhysicalType, PhysicalUnit};
use chrono::{DateTime, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// A container's selected contents: item metadata, the shared timestamp
/// axis, and one float column per item, all in selection order.
#[derive(Debug)]
pub struct LoadedSeries {
    pub items: Vec<SeriesItem>,
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<Vec<f64>>,
}

/// Read the named items from a container.
///
/// Items come back in the order they were requested; requesting an item the
/// container does not hold is an `ItemNotFound` error. An empty request
/// selects every item in file order.
pub fn read_series(path: &Path, wanted: &[String]) -> HeadgateResult<LoadedSeries> {
    let mut r = BufReader::new(File::open(path)?);

    let magic: [u8; 4] = read_bytes(&mut r)?;
    if magic != MAGIC {
        return Err(HeadgateError::Store(format!(
            "{} is not a ts0 container",
            path.display()
        )));
    }
    let version = read_u16(&mut r)?;
    if version != FORMAT_VERSION {
        return Err(HeadgateError::Store(format!(
            "unsupported container version {}",
            version
        )));
    }

    let item_count = read_u16(&mut r)? as usize;
    let step_count = read_u32(&mut r)? as usize;

    let mut items = Vec::with_capacity(item_count);
    for _ in 0..item_count {
        let name = read_string(&mut r)?;
        let type_tag = read_u16(&mut r)?;
        let unit_tag = read_u16(&mut r)?;
        let ptype = PhysicalType::from_tag(type_tag)
            .ok_or_else(|| HeadgateError::Store(format!("unknown type tag {}", type_tag)))?;
        let punit = PhysicalUnit::from_tag(unit_tag)
            .ok_or_else(|| HeadgateError::Store(format!("unknown unit tag {}", unit_tag)))?;
        items.push(SeriesItem { name, ptype, punit });
    }

    let mut timestamps = Vec::with_capacity(step_count);
    for _ in 0..step_count {
        let secs = read_i64(&mut r)?;
        let ts = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| HeadgateError::Store(format!("timestamp {} out of range", secs)))?;
        timestamps.push(ts.naive_utc());
    }

    let mut columns = Vec::with_capacity(item_count);
    for _ in 0..item_count {
        let mut column = Vec::with_capacity(step_count);
        for _ in 0..step_count {
            column.push(read_f64(&mut r)?);
        }
        columns.push(column);
    }

    debug!(
        path = %path.display(),
        items = items.len(),
        steps = step_count,
        "read container"
    );

    if wanted.is_empty() {
        return Ok(LoadedSeries {
            items,
            timestamps,
            columns,
        });
    }

    let mut selected_items = Vec::with_capacity(wanted.len());
    let mut selected_columns = Vec::with_capacity(wanted.len());
    for name in wanted {
        let idx = items
            .iter()
            .position(|item| &item.name == name)
            .ok_or_else(|| HeadgateError::ItemNotFound {
                file: path.display().to_string(),
                item: name.clone(),
            })?;
        selected_items.push(items[idx].clone());
        selected_columns.push(columns[idx].clone());
    }

    Ok(LoadedSeries {
        items: selected_items,
        timestamps,
        columns: selected_columns,
    })
}
