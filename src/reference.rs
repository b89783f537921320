//! Node-name lookup table.
//!
//! The workbook's reference sheet pairs each node name (column 1) with the
//! short external id (column 2) used in the data table's item labels. The
//! table region has no declared end; the scan stops at the first row whose
//! external-id cell is blank.

use crate::error::{HeadgateError, HeadgateResult};
use crate::sheet::cells::{trimmed_string, EMPTY_CELL};
use calamine::{Data, Range};
use std::collections::HashMap;
use tracing::debug;

/// Mapping from external id to node name.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, String>,
}

impl ReferenceTable {
    /// Scan the reference sheet starting at `first_row` (1-based).
    pub fn load(sheet: &Range<Data>, first_row: u32) -> Self {
        let mut entries = HashMap::new();

        // Rows are 1-based; a start row of 0 means row 1.
        for row in first_row.max(1).. {
            let id_cell = sheet.get_value((row - 1, 1)).unwrap_or(&EMPTY_CELL);
            let Some(external_id) = trimmed_string(id_cell) else {
                break;
            };

            let node_cell = sheet.get_value((row - 1, 0)).unwrap_or(&EMPTY_CELL);
            let node = trimmed_string(node_cell).unwrap_or_default();
            entries.insert(external_id, node);
        }

        debug!(entries = entries.len(), "loaded reference table");
        ReferenceTable { entries }
    }

    /// Node name for an external id.
    pub fn node_for(&self, external_id: &str) -> HeadgateResult<&str> {
        self.entries
            .get(external_id)
            .map(String::as_str)
            .ok_or_else(|| HeadgateError::MissingReferenceEntry(external_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
