//! Header Parser
//!
//! Decodes and validates the fixed file header. The header carries its own
//! declared length; the parser never reads past it, so the record section
//! begins exactly at `header_len`.

use std::io::Read;

use bytes::Buf;

use crate::error::{FlowError, Result};
use crate::format::FormatVersion;

/// Magic bytes identifying a flow export file
pub(crate) const MAGIC: [u8; 2] = [0xCA, 0xD5];

/// Fixed prologue size: everything before the variable comment
pub const PROLOGUE_LEN: usize = 26;

// =============================================================================
// Byte Order
// =============================================================================

/// Endianness declared in the header and applied to every record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub(crate) fn read_u16(self, buf: &mut impl Buf) -> u16 {
        match self {
            ByteOrder::Big => buf.get_u16(),
            ByteOrder::Little => buf.get_u16_le(),
        }
    }

    pub(crate) fn read_u32(self, buf: &mut impl Buf) -> u32 {
        match self {
            ByteOrder::Big => buf.get_u32(),
            ByteOrder::Little => buf.get_u32_le(),
        }
    }

    pub(crate) fn read_u64(self, buf: &mut impl Buf) -> u64 {
        match self {
            ByteOrder::Big => buf.get_u64(),
            ByteOrder::Little => buf.get_u64_le(),
        }
    }
}

// =============================================================================
// Compression
// =============================================================================

/// Record-section compression declared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    /// lz4 block with prepended uncompressed size
    Lz4,
}

// =============================================================================
// File Header
// =============================================================================

/// Decoded file header. Immutable after parse.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub version: FormatVersion,
    pub byte_order: ByteOrder,
    pub compression: Compression,
    /// Declared number of records in the file
    pub record_count: u32,
    /// Capture window start, unix seconds
    pub capture_start: u32,
    /// Capture window end, unix seconds
    pub capture_end: u32,
    pub vendor_id: u32,
    pub comment: String,
    /// Total header length; record content starts here
    pub header_len: u16,
}

impl FileHeader {
    /// Parse a header from the start of a byte stream.
    ///
    /// Multi-byte fields from the version tag onward are read in the byte
    /// order declared at offset 2, so the same order applies to header and
    /// records alike.
    pub fn parse(reader: &mut dyn Read) -> Result<FileHeader> {
        let mut prologue = [0u8; PROLOGUE_LEN];
        reader
            .read_exact(&mut prologue)
            .map_err(|_| FlowError::MalformedHeader("file shorter than header prologue".into()))?;

        if prologue[0..2] != MAGIC {
            return Err(FlowError::MalformedHeader(format!(
                "bad magic: expected {:02x}{:02x}, got {:02x}{:02x}",
                MAGIC[0], MAGIC[1], prologue[0], prologue[1]
            )));
        }

        let byte_order = match prologue[2] {
            1 => ByteOrder::Big,
            2 => ByteOrder::Little,
            other => {
                return Err(FlowError::MalformedHeader(format!(
                    "unknown byte order flag: {}",
                    other
                )))
            }
        };

        let compression = match prologue[3] {
            0 => Compression::None,
            1 => Compression::Lz4,
            other => {
                return Err(FlowError::MalformedHeader(format!(
                    "unknown compression flag: {}",
                    other
                )))
            }
        };

        let mut buf = &prologue[4..];
        let version = FormatVersion::from_u16(byte_order.read_u16(&mut buf))?;
        let header_len = byte_order.read_u16(&mut buf);
        let record_count = byte_order.read_u32(&mut buf);
        let capture_start = byte_order.read_u32(&mut buf);
        let capture_end = byte_order.read_u32(&mut buf);
        let vendor_id = byte_order.read_u32(&mut buf);
        let comment_len = byte_order.read_u16(&mut buf) as usize;

        if header_len as usize != PROLOGUE_LEN + comment_len {
            return Err(FlowError::MalformedHeader(format!(
                "declared header length {} does not match prologue + comment {}",
                header_len,
                PROLOGUE_LEN + comment_len
            )));
        }

        // Read exactly the comment; nothing past the declared header length.
        let mut comment_bytes = vec![0u8; comment_len];
        reader
            .read_exact(&mut comment_bytes)
            .map_err(|_| FlowError::MalformedHeader("file shorter than declared header".into()))?;
        let comment = String::from_utf8(comment_bytes)
            .map_err(|_| FlowError::MalformedHeader("comment is not valid UTF-8".into()))?;

        Ok(FileHeader {
            version,
            byte_order,
            compression,
            record_count,
            capture_start,
            capture_end,
            vendor_id,
            comment,
            header_len,
        })
    }

    /// Whether the record section is compressed
    pub fn is_compressed(&self) -> bool {
        self.compression != Compression::None
    }
}
