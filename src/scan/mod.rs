//! Scan Module
//!
//! The per-file read path: header decode, fixed-width record decode, and
//! the streaming reader that ties them to a byte range.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Header (26-byte prologue + comment)                          │
//! │ ┌──────────┬───────┬──────┬─────────┬──────────┬──────────┐  │
//! │ │Magic (2) │Ord (1)│Cmp(1)│ Ver (2) │ HdrLen(2)│ Count (4)│  │
//! │ ├──────────┴───────┼──────┴───┬─────┴────┬─────┴────┬─────┤  │
//! │ │ Start (4)        │ End (4)  │Vendor (4)│CmtLen (2)│ Cmt │  │
//! │ └──────────────────┴──────────┴──────────┴──────────┴─────┘  │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Record Section                                               │
//! │   fixed-width records back to back, all fields in the        │
//! │   header's declared byte order; lz4 size-prepended block     │
//! │   when the compression flag is set                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod decoder;
mod header;
mod reader;

pub use decoder::{Record, RecordDecoder, RowValue};
pub use header::{ByteOrder, Compression, FileHeader, PROLOGUE_LEN};
pub use reader::RecordStream;
