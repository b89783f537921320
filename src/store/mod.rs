//! The ts0 series container.
//!
//! One container holds one or more tagged series over a shared timestamp
//! axis. Forward conversion writes single-item containers, one per exported
//! node; model results arrive as many-item containers. All integers and
//! floats are little-endian:
//!
//! ```text
//! magic      4 bytes   b"TS0\x1A"
//! version    u16       1
//! item_count u16
//! step_count u32
//! items      item_count x { name: u16 len + UTF-8, type tag u16, unit tag u16 }
//! timestamps step_count x i64 unix seconds
//! values     item-major, item_count x step_count x f64, NaN = missing
//! ```

mod reader;
mod writer;

pub use reader::{read_series, LoadedSeries};
pub use writer::{series_filename, write_container, TimeSeriesWriter};

use crate::error::{HeadgateError, HeadgateResult};
use crate::units::{PhysicalType, PhysicalUnit};
use std::io::{Read, Write};

pub const MAGIC: [u8; 4] = *b"TS0\x1A";
pub const FORMAT_VERSION: u16 = 1;
/// File extension used for exported series files.
pub const EXTENSION: &str = "ts0";

/// Metadata for one series inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesItem {
    /// Pipe-delimited item label as it appeared in the workbook.
    pub name: String,
    pub ptype: PhysicalType,
    pub punit: PhysicalUnit,
}

pub(crate) fn read_bytes<const N: usize>(r: &mut impl Read) -> HeadgateResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HeadgateError::Store("unexpected end of container".into())
        } else {
            HeadgateError::Io(e)
        }
    })?;
    Ok(buf)
}

pub(crate) fn read_u16(r: &mut impl Read) -> HeadgateResult<u16> {
    Ok(u16::from_le_bytes(read_bytes(r)?))
}

pub(crate) fn read_u32(r: &mut impl Read) -> HeadgateResult<u32> {
    Ok(u32::from_le_bytes(read_bytes(r)?))
}

pub(crate) fn read_i64(r: &mut impl Read) -> HeadgateResult<i64> {
    Ok(i64::from_le_bytes(read_bytes(r)?))
}

pub(crate) fn read_f64(r: &mut impl Read) -> HeadgateResult<f64> {
    Ok(f64::from_le_bytes(read_bytes(r)?))
}

pub(crate) fn read_string(r: &mut impl Read) -> HeadgateResult<String> {
    let len = read_u16(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HeadgateError::Store("unexpected end of container".into())
        } else {
            HeadgateError::Io(e)
        }
    })?;
    String::from_utf8(buf).map_err(|_| HeadgateError::Store("item name is not UTF-8".into()))
}

pub(crate) fn write_string(w: &mut impl Write, s: &str) -> HeadgateResult<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| HeadgateError::Store(format!("item name too long: {} bytes", s.len())))?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}
