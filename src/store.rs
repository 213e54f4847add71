//! Byte Store
//!
//! The filesystem port the engine reads through. Keeping this behind a
//! trait keeps decode/plan logic pure and lets tests observe exactly how
//! many record bytes a scan touched.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

// =============================================================================
// Port
// =============================================================================

/// Byte-range readable storage with atomic sidecar writes
pub trait ByteStore: Send + Sync {
    /// Open a reader over `[offset, offset + length)` of a file.
    /// `length = None` reads to end of file.
    fn open(&self, path: &Path, offset: u64, length: Option<u64>) -> Result<Box<dyn Read + Send>>;

    /// Size of a file in bytes
    fn len(&self, path: &Path) -> Result<u64>;

    /// Whether a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Write a whole file atomically (write-to-temp-then-rename).
    /// A failed or aborted write must leave no partial artifact behind.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

// =============================================================================
// Local Filesystem Implementation
// =============================================================================

/// ByteStore over the local filesystem
#[derive(Debug, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl ByteStore for LocalFileStore {
    fn open(&self, path: &Path, offset: u64, length: Option<u64>) -> Result<Box<dyn Read + Send>> {
        let mut file = File::open(path)?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset))?;
        }
        match length {
            Some(len) => Ok(Box::new(file.take(len))),
            None => Ok(Box::new(file)),
        }
    }

    fn len(&self, path: &Path) -> Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_path = temp_sibling(path);

        let result = (|| -> Result<()> {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(bytes)?;
            tmp.sync_all()?;
            fs::rename(&tmp_path, path)?;
            Ok(())
        })();

        if result.is_err() {
            // Rename did not happen; drop the temp file so no partial
            // artifact survives.
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

/// Temp path next to the target so the rename stays on one filesystem
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sidecar".to_string());
    name.push_str(".tmp");
    path.with_file_name(name)
}
