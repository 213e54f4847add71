//! Record Decoder
//!
//! Slices one fixed-width byte block into typed field values, driven
//! entirely by the version's field table. Values keep their native
//! representation; stringification is a separate presentation step.

use crate::error::{FlowError, Result};
use crate::format::{stringify_field, RecordLayout};

use super::ByteOrder;

// =============================================================================
// Record
// =============================================================================

/// One decoded flow record: native field values in layout order
#[derive(Debug, Clone)]
pub struct Record {
    values: Vec<u64>,
    layout: &'static RecordLayout,
}

/// A materialized cell, native or stringified per configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue {
    Native(u64),
    Display(String),
}

impl std::fmt::Display for RowValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowValue::Native(v) => write!(f, "{}", v),
            RowValue::Display(s) => write!(f, "{}", s),
        }
    }
}

impl Record {
    /// Native value of a field by column name
    pub fn value(&self, name: &str) -> Option<u64> {
        self.layout.field_index(name).map(|i| self.values[i])
    }

    /// All native values, in layout field order
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// The layout this record was decoded with
    pub fn layout(&self) -> &'static RecordLayout {
        self.layout
    }

    /// Materialize the record as a field-name → value row.
    ///
    /// With `stringify`, semantic fields (IPv4 addresses, protocol numbers)
    /// are converted to display form; everything else stays numeric.
    pub fn row(&self, stringify: bool) -> Vec<(&'static str, RowValue)> {
        self.layout
            .fields
            .iter()
            .zip(&self.values)
            .map(|(spec, &value)| {
                let cell = if stringify {
                    RowValue::Display(stringify_field(spec, value))
                } else {
                    RowValue::Native(value)
                };
                (spec.name, cell)
            })
            .collect()
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Table-driven decoder for one file's records
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    layout: &'static RecordLayout,
    byte_order: ByteOrder,
}

impl RecordDecoder {
    pub fn new(layout: &'static RecordLayout, byte_order: ByteOrder) -> Self {
        Self { layout, byte_order }
    }

    /// Record size this decoder consumes per call
    pub fn record_width(&self) -> usize {
        self.layout.record_width
    }

    /// Decode one record from the front of `block`
    pub fn decode(&self, block: &[u8]) -> Result<Record> {
        if block.len() < self.layout.record_width {
            return Err(FlowError::TruncatedRecord {
                expected: self.layout.record_width,
                actual: block.len(),
            });
        }

        let mut values = Vec::with_capacity(self.layout.fields.len());
        for spec in self.layout.fields {
            let mut slice = &block[spec.offset..spec.offset + spec.width];
            let value = match spec.width {
                1 => slice[0] as u64,
                2 => self.byte_order.read_u16(&mut slice) as u64,
                4 => self.byte_order.read_u32(&mut slice) as u64,
                8 => self.byte_order.read_u64(&mut slice),
                other => {
                    // Field tables only carry 1/2/4/8-byte widths; a stray
                    // width is a catalog bug, not a data problem.
                    return Err(FlowError::CorruptData(format!(
                        "field {} has unsupported width {}",
                        spec.name, other
                    )));
                }
            };
            values.push(value);
        }

        Ok(Record {
            values,
            layout: self.layout,
        })
    }
}
