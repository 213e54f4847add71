//! Statistics Sidecar
//!
//! Persists a [`StatisticsEntry`] next to its data file. The sidecar is an
//! optimization hint: load failures of any kind degrade to "no statistics"
//! and persist failures are the caller's to log and ignore. Writes go
//! through [`ByteStore::write_atomic`] so an aborted task leaves no partial
//! artifact, and concurrent writers resolve last-writer-wins.
//!
//! ## Sidecar Format
//! ```text
//! ┌───────────┬─────────────┬──────────┬─────────────────────┐
//! │ Magic (4) │ Version (2) │ CRC (4)  │   bincode payload   │
//! └───────────┴─────────────┴──────────┴─────────────────────┘
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};
use crate::store::ByteStore;

use super::StatisticsEntry;

/// Magic bytes identifying a flowscan statistics sidecar
const MAGIC: &[u8; 4] = b"FSST";

/// Current sidecar format version
const VERSION: u16 = 1;

/// Fixed prefix: magic (4) + version (2) + crc (4)
const PREFIX_LEN: usize = 10;

/// Sidecar path for a data file: `.statistics-<filename>` in the same
/// directory
pub fn sidecar_path(data_path: &Path) -> PathBuf {
    let name = data_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    data_path.with_file_name(format!(".statistics-{}", name))
}

/// Load the statistics entry for a data file, if a valid sidecar exists.
///
/// Never fatal: a missing, short, corrupt, or incompatible sidecar is
/// logged at info level and treated as "no statistics".
pub fn load(store: &dyn ByteStore, data_path: &Path) -> Option<StatisticsEntry> {
    let path = sidecar_path(data_path);
    if !store.exists(&path) {
        return None;
    }

    match read_entry(store, &path) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::info!(sidecar = %path.display(), error = %e, "ignoring unreadable statistics sidecar");
            None
        }
    }
}

/// Persist a statistics entry atomically next to its data file.
///
/// Failures are non-fatal for the scan; callers log and continue.
pub fn persist(store: &dyn ByteStore, data_path: &Path, entry: &StatisticsEntry) -> Result<()> {
    let payload = bincode::serialize(entry)
        .map_err(|e| FlowError::CorruptData(format!("statistics encode failed: {}", e)))?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut bytes = Vec::with_capacity(PREFIX_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&payload);

    store.write_atomic(&sidecar_path(data_path), &bytes)
}

fn read_entry(store: &dyn ByteStore, path: &Path) -> Result<StatisticsEntry> {
    let mut reader = store.open(path, 0, None)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.len() < PREFIX_LEN {
        return Err(FlowError::CorruptData("sidecar shorter than prefix".into()));
    }
    if &bytes[0..4] != MAGIC {
        return Err(FlowError::CorruptData("bad sidecar magic".into()));
    }

    let version = u16::from_le_bytes(bytes[4..6].try_into().unwrap());
    if version != VERSION {
        return Err(FlowError::CorruptData(format!(
            "unsupported sidecar version: {}",
            version
        )));
    }

    let expected_crc = u32::from_le_bytes(bytes[6..10].try_into().unwrap());
    let payload = &bytes[PREFIX_LEN..];

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != expected_crc {
        return Err(FlowError::CorruptData("sidecar checksum mismatch".into()));
    }

    bincode::deserialize(payload)
        .map_err(|e| FlowError::CorruptData(format!("statistics decode failed: {}", e)))
}
