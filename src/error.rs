//! Error types for flowscan
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FlowError
pub type Result<T> = std::result::Result<T, FlowError>;

/// Unified error type for flowscan operations
#[derive(Debug, Error)]
pub enum FlowError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    /// Unknown export version. Fatal for the whole query: without a layout
    /// no file can be interpreted, so this surfaces at planning time.
    #[error("unsupported NetFlow export version: {0}")]
    UnsupportedVersion(u16),

    /// Bad magic, short prologue, or inconsistent declared lengths.
    /// Fatal for the affected file only.
    #[error("malformed file header: {0}")]
    MalformedHeader(String),

    /// Fewer bytes remain than one full record. Complete records decoded
    /// before the fragment are still valid.
    #[error("truncated record: expected {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    /// Decompression or record-section integrity failure. Fatal for the
    /// affected file, not for the whole scan.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
