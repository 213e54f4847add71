//! Shared test fixtures
//!
//! The engine itself is read-only, so tests write flow files through this
//! builder: header prologue + comment, then fixed-width records, optionally
//! lz4-compressed as one size-prepended block.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flowscan::format::{layout_for, FormatVersion, RecordLayout};
use flowscan::scan::ByteOrder;
use flowscan::store::{ByteStore, LocalFileStore};
use flowscan::Result;

// =============================================================================
// Flow File Builder
// =============================================================================

pub struct FlowFileBuilder {
    version: FormatVersion,
    byte_order: ByteOrder,
    compressed: bool,
    capture_start: u32,
    capture_end: u32,
    vendor_id: u32,
    comment: String,
    records: Vec<HashMap<&'static str, u64>>,
}

impl FlowFileBuilder {
    pub fn v5() -> Self {
        Self::new(FormatVersion::V5)
    }

    pub fn new(version: FormatVersion) -> Self {
        Self {
            version,
            byte_order: ByteOrder::Big,
            compressed: false,
            capture_start: 1000,
            capture_end: 2000,
            vendor_id: 9,
            comment: String::new(),
            records: Vec::new(),
        }
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn compressed(mut self) -> Self {
        self.compressed = true;
        self
    }

    pub fn capture_window(mut self, start: u32, end: u32) -> Self {
        self.capture_start = start;
        self.capture_end = end;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Add a record; unnamed fields default to zero
    pub fn record(mut self, fields: &[(&'static str, u64)]) -> Self {
        self.records.push(fields.iter().copied().collect());
        self
    }

    /// Add `count` zero-filled records
    pub fn zero_records(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.records.push(HashMap::new());
        }
        self
    }

    pub fn write(self, path: &Path) {
        fs::write(path, self.encode()).unwrap();
    }

    pub fn encode(self) -> Vec<u8> {
        let layout = layout_for(self.version).unwrap();

        let mut body = Vec::with_capacity(self.records.len() * layout.record_width);
        for record in &self.records {
            body.extend_from_slice(&encode_record(layout, self.byte_order, record));
        }
        if self.compressed {
            body = lz4_flex::compress_prepend_size(&body);
        }

        let mut bytes = encode_header(
            self.version,
            self.byte_order,
            self.compressed,
            self.records.len() as u32,
            self.capture_start,
            self.capture_end,
            self.vendor_id,
            &self.comment,
        );
        bytes.extend_from_slice(&body);
        bytes
    }
}

#[allow(clippy::too_many_arguments)]
pub fn encode_header(
    version: FormatVersion,
    byte_order: ByteOrder,
    compressed: bool,
    record_count: u32,
    capture_start: u32,
    capture_end: u32,
    vendor_id: u32,
    comment: &str,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(26 + comment.len());
    bytes.push(0xCA);
    bytes.push(0xD5);
    bytes.push(match byte_order {
        ByteOrder::Big => 1,
        ByteOrder::Little => 2,
    });
    bytes.push(if compressed { 1 } else { 0 });
    put_u16(&mut bytes, byte_order, version.as_u16());
    put_u16(&mut bytes, byte_order, (26 + comment.len()) as u16);
    put_u32(&mut bytes, byte_order, record_count);
    put_u32(&mut bytes, byte_order, capture_start);
    put_u32(&mut bytes, byte_order, capture_end);
    put_u32(&mut bytes, byte_order, vendor_id);
    put_u16(&mut bytes, byte_order, comment.len() as u16);
    bytes.extend_from_slice(comment.as_bytes());
    bytes
}

pub fn encode_record(
    layout: &RecordLayout,
    byte_order: ByteOrder,
    fields: &HashMap<&'static str, u64>,
) -> Vec<u8> {
    let mut block = vec![0u8; layout.record_width];
    for spec in layout.fields {
        let value = fields.get(spec.name).copied().unwrap_or(0);
        let encoded = match byte_order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        let src = match byte_order {
            ByteOrder::Big => &encoded[8 - spec.width..],
            ByteOrder::Little => &encoded[..spec.width],
        };
        block[spec.offset..spec.offset + spec.width].copy_from_slice(src);
    }
    block
}

fn put_u16(out: &mut Vec<u8>, order: ByteOrder, value: u16) {
    match order {
        ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
        ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
    }
}

fn put_u32(out: &mut Vec<u8>, order: ByteOrder, value: u32) {
    match order {
        ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
        ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
    }
}

/// Cut the last `n` bytes off a file
pub fn truncate_tail(path: &Path, n: u64) {
    let len = fs::metadata(path).unwrap().len();
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_len(len - n).unwrap();
}

// =============================================================================
// Counting Store
// =============================================================================

/// ByteStore wrapper that counts record-section bytes read.
///
/// Header reads open at offset 0; record reads open past the header. The
/// skip-scan tests assert the latter stays at zero.
pub struct CountingStore {
    inner: LocalFileStore,
    record_bytes: Arc<AtomicU64>,
}

impl CountingStore {
    pub fn new() -> (Arc<Self>, Arc<AtomicU64>) {
        let counter = Arc::new(AtomicU64::new(0));
        let store = Arc::new(Self {
            inner: LocalFileStore::new(),
            record_bytes: Arc::clone(&counter),
        });
        (store, counter)
    }
}

impl ByteStore for CountingStore {
    fn open(&self, path: &Path, offset: u64, length: Option<u64>) -> Result<Box<dyn Read + Send>> {
        let reader = self.inner.open(path, offset, length)?;
        if offset == 0 {
            Ok(reader)
        } else {
            Ok(Box::new(CountingReader {
                inner: reader,
                counter: Arc::clone(&self.record_bytes),
            }))
        }
    }

    fn len(&self, path: &Path) -> Result<u64> {
        self.inner.len(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.inner.write_atomic(path, bytes)
    }
}

struct CountingReader {
    inner: Box<dyn Read + Send>,
    counter: Arc<AtomicU64>,
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

// =============================================================================
// Misc Helpers
// =============================================================================

pub fn temp_flow_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
