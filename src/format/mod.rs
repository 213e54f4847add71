//! Format Module
//!
//! Declarative per-version field layouts for NetFlow export files.
//!
//! ## Responsibilities
//! - Enumerate supported export versions
//! - Describe each version's record as a flat table of fixed-width fields
//! - Classify fields semantically so presentation (stringify) and literal
//!   conversion know how to treat them
//!
//! Decoding is driven entirely by the [`FieldSpec`] tables in [`catalog`];
//! there is no per-field dispatch. A version's specs never overlap and
//! exactly tile the record length.

mod catalog;
mod display;

pub use catalog::{layout_for, RecordLayout, V5_LAYOUT, V7_LAYOUT};
pub use display::{protocol_name, protocol_number, stringify_field};

use crate::error::{FlowError, Result};

// =============================================================================
// Format Version
// =============================================================================

/// NetFlow export versions known to the engine.
///
/// V9 is enumerated but has no fixed layout: its records are described by
/// templates carried in the stream, which this engine does not decode yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    V5,
    V7,
    V9,
}

impl FormatVersion {
    /// Parse a version tag as found in a file header
    pub fn from_u16(raw: u16) -> Result<Self> {
        match raw {
            5 => Ok(FormatVersion::V5),
            7 => Ok(FormatVersion::V7),
            9 => Ok(FormatVersion::V9),
            other => Err(FlowError::UnsupportedVersion(other)),
        }
    }

    /// The wire tag for this version
    pub fn as_u16(self) -> u16 {
        match self {
            FormatVersion::V5 => 5,
            FormatVersion::V7 => 7,
            FormatVersion::V9 => 9,
        }
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.as_u16())
    }
}

// =============================================================================
// Field Specification
// =============================================================================

/// What a field's integer value means, beyond its raw encoding.
///
/// Drives stringification and query-literal conversion only; statistics and
/// predicate comparison always use the native integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticKind {
    /// 32-bit IPv4 address (display: dotted quad)
    Ipv4Addr,
    /// Transport port number
    Port,
    /// IP protocol number (display: IANA keyword, e.g. "TCP")
    Protocol,
    /// Byte/packet counter
    Counter,
    /// Seconds or sysuptime-relative milliseconds
    Timestamp,
    /// No special meaning
    Raw,
}

/// One fixed-width unsigned field inside a record
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Column name exposed to the query layer
    pub name: &'static str,
    /// Byte offset from the start of the record
    pub offset: usize,
    /// Width in bytes (1, 2, 4, or 8)
    pub width: usize,
    /// Semantic classification
    pub kind: SemanticKind,
}

impl FieldSpec {
    /// Largest value representable in this field's width
    pub fn max_native(&self) -> u64 {
        if self.width >= 8 {
            u64::MAX
        } else {
            (1u64 << (self.width * 8)) - 1
        }
    }
}
