//! Format Catalog
//!
//! Static field tables for each supported export version. The tables are
//! the single source of truth for offsets and widths; the decoder, the
//! statistics builder, and the filter resolver all key off them.
//!
//! ## V5 Record Layout (60 bytes)
//! ```text
//! ┌────────────┬──────┬───────┬───────────┐
//! │ field      │ off  │ width │ semantic  │
//! ├────────────┼──────┼───────┼───────────┤
//! │ unix_secs  │  0   │  4    │ timestamp │
//! │ unix_nsecs │  4   │  4    │ timestamp │
//! │ sysuptime  │  8   │  4    │ counter   │
//! │ srcaddr    │ 12   │  4    │ ipv4      │
//! │ dstaddr    │ 16   │  4    │ ipv4      │
//! │ nexthop    │ 20   │  4    │ ipv4      │
//! │ input      │ 24   │  2    │ raw       │
//! │ output     │ 26   │  2    │ raw       │
//! │ packets    │ 28   │  4    │ counter   │
//! │ octets     │ 32   │  4    │ counter   │
//! │ first      │ 36   │  4    │ timestamp │
//! │ last       │ 40   │  4    │ timestamp │
//! │ srcport    │ 44   │  2    │ port      │
//! │ dstport    │ 46   │  2    │ port      │
//! │ protocol   │ 48   │  1    │ protocol  │
//! │ tos        │ 49   │  1    │ raw       │
//! │ tcp_flags  │ 50   │  1    │ raw       │
//! │ engine_type│ 51   │  1    │ raw       │
//! │ engine_id  │ 52   │  1    │ raw       │
//! │ src_mask   │ 53   │  1    │ raw       │
//! │ dst_mask   │ 54   │  1    │ raw       │
//! │ pad        │ 55   │  1    │ raw       │
//! │ src_as     │ 56   │  2    │ raw       │
//! │ dst_as     │ 58   │  2    │ raw       │
//! └────────────┴──────┴───────┴───────────┘
//! ```
//!
//! V7 appends `flags` (u32) and `router_sc` (IPv4 u32) for a 68-byte record.

use crate::error::{FlowError, Result};

use super::{FieldSpec, FormatVersion, SemanticKind};

// =============================================================================
// Record Layout
// =============================================================================

/// The complete decoding recipe for one export version
#[derive(Debug)]
pub struct RecordLayout {
    /// Version this layout describes
    pub version: FormatVersion,
    /// Ordered field table; offsets tile `record_width` exactly
    pub fields: &'static [FieldSpec],
    /// Fixed record size in bytes
    pub record_width: usize,
}

impl RecordLayout {
    /// Look up a field spec by column name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of a field in the decoded value vector
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Resolve the layout for a version
///
/// V9 records are template-described rather than fixed-width, so V9 is
/// rejected here even though the header parser recognizes its tag.
pub fn layout_for(version: FormatVersion) -> Result<&'static RecordLayout> {
    match version {
        FormatVersion::V5 => Ok(&V5_LAYOUT),
        FormatVersion::V7 => Ok(&V7_LAYOUT),
        FormatVersion::V9 => Err(FlowError::UnsupportedVersion(9)),
    }
}

// =============================================================================
// Field Tables
// =============================================================================

macro_rules! field {
    ($name:expr, $offset:expr, $width:expr, $kind:ident) => {
        FieldSpec {
            name: $name,
            offset: $offset,
            width: $width,
            kind: SemanticKind::$kind,
        }
    };
}

const V5_FIELDS: &[FieldSpec] = &[
    field!("unix_secs", 0, 4, Timestamp),
    field!("unix_nsecs", 4, 4, Timestamp),
    field!("sysuptime", 8, 4, Counter),
    field!("srcaddr", 12, 4, Ipv4Addr),
    field!("dstaddr", 16, 4, Ipv4Addr),
    field!("nexthop", 20, 4, Ipv4Addr),
    field!("input", 24, 2, Raw),
    field!("output", 26, 2, Raw),
    field!("packets", 28, 4, Counter),
    field!("octets", 32, 4, Counter),
    field!("first", 36, 4, Timestamp),
    field!("last", 40, 4, Timestamp),
    field!("srcport", 44, 2, Port),
    field!("dstport", 46, 2, Port),
    field!("protocol", 48, 1, Protocol),
    field!("tos", 49, 1, Raw),
    field!("tcp_flags", 50, 1, Raw),
    field!("engine_type", 51, 1, Raw),
    field!("engine_id", 52, 1, Raw),
    field!("src_mask", 53, 1, Raw),
    field!("dst_mask", 54, 1, Raw),
    field!("pad", 55, 1, Raw),
    field!("src_as", 56, 2, Raw),
    field!("dst_as", 58, 2, Raw),
];

const V7_FIELDS: &[FieldSpec] = &[
    field!("unix_secs", 0, 4, Timestamp),
    field!("unix_nsecs", 4, 4, Timestamp),
    field!("sysuptime", 8, 4, Counter),
    field!("srcaddr", 12, 4, Ipv4Addr),
    field!("dstaddr", 16, 4, Ipv4Addr),
    field!("nexthop", 20, 4, Ipv4Addr),
    field!("input", 24, 2, Raw),
    field!("output", 26, 2, Raw),
    field!("packets", 28, 4, Counter),
    field!("octets", 32, 4, Counter),
    field!("first", 36, 4, Timestamp),
    field!("last", 40, 4, Timestamp),
    field!("srcport", 44, 2, Port),
    field!("dstport", 46, 2, Port),
    field!("protocol", 48, 1, Protocol),
    field!("tos", 49, 1, Raw),
    field!("tcp_flags", 50, 1, Raw),
    field!("engine_type", 51, 1, Raw),
    field!("engine_id", 52, 1, Raw),
    field!("src_mask", 53, 1, Raw),
    field!("dst_mask", 54, 1, Raw),
    field!("pad", 55, 1, Raw),
    field!("src_as", 56, 2, Raw),
    field!("dst_as", 58, 2, Raw),
    field!("flags", 60, 4, Raw),
    field!("router_sc", 64, 4, Ipv4Addr),
];

/// Version 5: 60-byte fixed records
pub static V5_LAYOUT: RecordLayout = RecordLayout {
    version: FormatVersion::V5,
    fields: V5_FIELDS,
    record_width: 60,
};

/// Version 7: 68-byte fixed records
pub static V7_LAYOUT: RecordLayout = RecordLayout {
    version: FormatVersion::V7,
    fields: V7_FIELDS,
    record_width: 68,
};
