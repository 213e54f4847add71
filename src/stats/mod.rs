//! Statistics Index
//!
//! Per-file, per-column min/max summaries used by the scan planner to prove
//! a file cannot contain matching records. Values are always the native
//! integer representation, never stringified, so comparisons against
//! resolved predicates are exact.
//!
//! ## Responsibilities
//! - Fold min/max/has_null over every field of every record in a file
//! - Round-trip losslessly through the sidecar artifact
//! - Stay advisory: a missing or unreadable entry only costs performance

mod sidecar;

pub use sidecar::{load, persist, sidecar_path};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::RecordLayout;
use crate::scan::Record;

// =============================================================================
// Column Statistics
// =============================================================================

/// Min/max/nullability summary for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub min: u64,
    pub max: u64,
    pub has_null: bool,
}

/// Per-file statistics, keyed by field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsEntry {
    /// Export version tag the statistics were built against
    pub version: u16,
    /// Number of records folded in
    pub record_count: u64,
    /// Field name → column summary
    pub columns: BTreeMap<String, ColumnStats>,
}

impl StatisticsEntry {
    /// Look up one column's summary
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.get(name)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Incremental min/max fold over a file's records
pub struct StatisticsBuilder {
    layout: &'static RecordLayout,
    mins: Vec<u64>,
    maxs: Vec<u64>,
    count: u64,
}

impl StatisticsBuilder {
    pub fn new(layout: &'static RecordLayout) -> Self {
        let n = layout.fields.len();
        Self {
            layout,
            mins: vec![u64::MAX; n],
            maxs: vec![0; n],
            count: 0,
        }
    }

    /// Fold one record in. Must be called for every record of the file,
    /// before any row-level filtering, so min/max describe the whole file.
    pub fn fold(&mut self, record: &Record) {
        for (i, &value) in record.values().iter().enumerate() {
            if value < self.mins[i] {
                self.mins[i] = value;
            }
            if value > self.maxs[i] {
                self.maxs[i] = value;
            }
        }
        self.count += 1;
    }

    /// Finish the fold.
    ///
    /// Fixed-width v5/v7 records carry a value in every field, so
    /// `has_null` is always false here; the flag exists for the sidecar
    /// contract and for formats that may produce absent fields later.
    pub fn finish(self) -> StatisticsEntry {
        let mut columns = BTreeMap::new();
        for (i, spec) in self.layout.fields.iter().enumerate() {
            let (min, max) = if self.count == 0 {
                (0, 0)
            } else {
                (self.mins[i], self.maxs[i])
            };
            columns.insert(
                spec.name.to_string(),
                ColumnStats {
                    min,
                    max,
                    has_null: false,
                },
            );
        }
        StatisticsEntry {
            version: self.layout.version.as_u16(),
            record_count: self.count,
            columns,
        }
    }
}
