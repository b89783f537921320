//! Series container writing.

use crate::error::{HeadgateError, HeadgateResult};
use crate::store::{write_string, SeriesItem, EXTENSION, FORMAT_VERSION, MAGIC};
use calamine::Data;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination filename for a node's series.
///
/// Return-flow items share their node with the forward flow; they get an
/// `_rf` marker before the extension so both series can coexist.
pub fn series_filename(node: &str, item: &str) -> String {
    if item.to_lowercase().contains("return") {
        format!("{}_rf.{}", node, EXTENSION)
    } else {
        format!("{}.{}", node, EXTENSION)
    }
}

/// Writes single-item containers into an output directory.
pub struct TimeSeriesWriter {
    outdir: PathBuf,
}

impl TimeSeriesWriter {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
        }
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// Coerce one item column to floats and write it as a tagged container.
    ///
    /// The destination file is truncated if it already exists. Returns the
    /// path written.
    pub fn write_series(
        &self,
        node: &str,
        item: &SeriesItem,
        timestamps: &[NaiveDateTime],
        values: &[Data],
    ) -> HeadgateResult<PathBuf> {
        if values.len() != timestamps.len() {
            return Err(HeadgateError::Store(format!(
                "item '{}' has {} values for {} timestamps",
                item.name,
                values.len(),
                timestamps.len()
            )));
        }

        let floats = coerce_column(&item.name, values)?;

        std::fs::create_dir_all(&self.outdir)?;
        let path = self.outdir.join(series_filename(node, &item.name));
        write_container(&path, std::slice::from_ref(item), timestamps, &[floats])?;

        debug!(path = %path.display(), steps = timestamps.len(), "wrote series");
        Ok(path)
    }
}

/// Write a complete container: shared timestamps plus one value column per
/// item. Items and columns correspond by position.
pub fn write_container(
    path: &Path,
    items: &[SeriesItem],
    timestamps: &[NaiveDateTime],
    columns: &[Vec<f64>],
) -> HeadgateResult<()> {
    if items.len() != columns.len() {
        return Err(HeadgateError::Store(format!(
            "{} items for {} value columns",
            items.len(),
            columns.len()
        )));
    }
    let item_count = u16::try_from(items.len())
        .map_err(|_| HeadgateError::Store(format!("too many items: {}", items.len())))?;
    let step_count = u32::try_from(timestamps.len())
        .map_err(|_| HeadgateError::Store(format!("too many steps: {}", timestamps.len())))?;

    let mut w = BufWriter::new(File::create(path)?);

    w.write_all(&MAGIC)?;
    w.write_all(&FORMAT_VERSION.to_le_bytes())?;
    w.write_all(&item_count.to_le_bytes())?;
    w.write_all(&step_count.to_le_bytes())?;

    for item in items {
        write_string(&mut w, &item.name)?;
        w.write_all(&item.ptype.tag().to_le_bytes())?;
        w.write_all(&item.punit.tag().to_le_bytes())?;
    }

    for ts in timestamps {
        w.write_all(&ts.and_utc().timestamp().to_le_bytes())?;
    }

    for column in columns {
        if column.len() != timestamps.len() {
            return Err(HeadgateError::Store(format!(
                "column has {} values for {} timestamps",
                column.len(),
                timestamps.len()
            )));
        }
        for value in column {
            w.write_all(&value.to_le_bytes())?;
        }
    }

    w.flush()?;
    Ok(())
}

/// Coerce a cell column to floats.
///
/// Numbers pass through, booleans become 0/1, numeric text is parsed, and
/// empty cells become NaN. Anything else is a `NonNumericValue` naming the
/// item and the 1-based record number.
fn coerce_column(item: &str, values: &[Data]) -> HeadgateResult<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let coerced = match cell {
                Data::Float(f) => Some(*f),
                Data::Int(i) => Some(*i as f64),
                Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                Data::String(s) => s.trim().parse::<f64>().ok(),
                Data::Empty => Some(f64::NAN),
                _ => None,
            };
            coerced.ok_or_else(|| HeadgateError::NonNumericValue {
                item: item.to_string(),
                row: idx + 1,
            })
        })
        .collect()
}
