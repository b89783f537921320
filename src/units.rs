//! Physical type and unit resolution.
//!
//! Every exported column must map to a tagged physical quantity before it can
//! be written to the series store. The mapping is a total three-outcome
//! match: a flow series, a return-flow fraction, or a hard error. There is no
//! default branch; a unit string outside the table surfaces as
//! `UnresolvedUnit` instead of silently producing no file.

use crate::error::{HeadgateError, HeadgateResult};
use std::fmt;

/// Physical quantity of a stored series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    /// Volumetric flow rate at a node.
    WaterFlow,
    /// Dimensionless fraction of diverted flow returned to the system.
    ReturnFlowFraction,
}

impl PhysicalType {
    /// Wire tag used by the ts0 container.
    pub fn tag(&self) -> u16 {
        match self {
            PhysicalType::WaterFlow => 1,
            PhysicalType::ReturnFlowFraction => 2,
        }
    }

    /// Decode a wire tag.
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(PhysicalType::WaterFlow),
            2 => Some(PhysicalType::ReturnFlowFraction),
            _ => None,
        }
    }

    /// The unit a series of this type carries when none is spelled out.
    pub fn default_unit(&self) -> PhysicalUnit {
        match self {
            PhysicalType::WaterFlow => PhysicalUnit::CubicFeetPerSecond,
            PhysicalType::ReturnFlowFraction => PhysicalUnit::Fraction,
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalType::WaterFlow => write!(f, "Water Flow"),
            PhysicalType::ReturnFlowFraction => write!(f, "Return Flow Fraction"),
        }
    }
}

/// Physical unit of a stored series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalUnit {
    CubicFeetPerSecond,
    /// Dimensionless 0..1 fraction.
    Fraction,
}

impl PhysicalUnit {
    /// Wire tag used by the ts0 container.
    pub fn tag(&self) -> u16 {
        match self {
            PhysicalUnit::CubicFeetPerSecond => 1,
            PhysicalUnit::Fraction => 2,
        }
    }

    /// Decode a wire tag.
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(PhysicalUnit::CubicFeetPerSecond),
            2 => Some(PhysicalUnit::Fraction),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalUnit::CubicFeetPerSecond => write!(f, "cfs"),
            PhysicalUnit::Fraction => write!(f, "fraction"),
        }
    }
}

/// Outcome of resolving one item column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Export the column as a tagged series.
    Series(PhysicalType, PhysicalUnit),
    /// Load flag was off: the column is intentionally not exported.
    Skipped,
}

/// Resolve an item column to its physical type and unit.
///
/// Rules, in order:
/// 1. load flag off → `Skipped`,
/// 2. unit `"cfs"` → water flow in cubic feet per second,
/// 3. empty unit on an item containing `Return` → return-flow fraction in
///    its default unit,
/// 4. anything else → `UnresolvedUnit`.
pub fn resolve(item: &str, load: bool, unit: &str) -> HeadgateResult<Resolution> {
    if !load {
        return Ok(Resolution::Skipped);
    }

    if unit == "cfs" {
        return Ok(Resolution::Series(
            PhysicalType::WaterFlow,
            PhysicalUnit::CubicFeetPerSecond,
        ));
    }

    // Return-flow columns carry no unit string in the workbook; the item
    // label is the only signal. Match is case-sensitive like the source data.
    if unit.is_empty() && item.contains("Return") {
        let ptype = PhysicalType::ReturnFlowFraction;
        return Ok(Resolution::Series(ptype, ptype.default_unit()));
    }

    Err(HeadgateError::UnresolvedUnit {
        item: item.to_string(),
        unit: unit.to_string(),
    })
}
