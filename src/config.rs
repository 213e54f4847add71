//! Configuration for flowscan
//!
//! Centralized configuration with sensible defaults.

use crate::format::FormatVersion;

/// How files are grouped into parallel work units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionMode {
    /// One partition per file
    PerFile,

    /// A fixed number of partitions; files/ranges bin-packed by size
    FixedCount(usize),

    /// Size-based heuristic: split large uncompressed files so each
    /// partition stays near `auto_partition_bytes`
    Auto,
}

/// Main configuration for a scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // -------------------------------------------------------------------------
    // Format Configuration
    // -------------------------------------------------------------------------
    /// Export version the files are expected to carry (required)
    pub version: FormatVersion,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Convert semantic fields (IPv4 addresses, protocol numbers) to
    /// display form when rows are materialized
    pub stringify: bool,

    // -------------------------------------------------------------------------
    // Statistics Configuration
    // -------------------------------------------------------------------------
    /// Enable collection and use of the per-file statistics sidecar
    pub statistics: bool,

    // -------------------------------------------------------------------------
    // Partitioning Configuration
    // -------------------------------------------------------------------------
    /// Partition assignment mode
    pub partition_mode: PartitionMode,

    /// Target partition size for `PartitionMode::Auto` (in bytes)
    pub auto_partition_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            version: FormatVersion::V5,
            stringify: true,
            statistics: false,
            partition_mode: PartitionMode::PerFile,
            auto_partition_bytes: 64 * 1024 * 1024, // 64 MiB
        }
    }
}

impl ScanConfig {
    /// Create a new config builder
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }
}

/// Builder for ScanConfig
#[derive(Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Set the expected export version
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.config.version = version;
        self
    }

    /// Enable or disable stringification of semantic fields
    pub fn stringify(mut self, enabled: bool) -> Self {
        self.config.stringify = enabled;
        self
    }

    /// Enable or disable the statistics sidecar
    pub fn statistics(mut self, enabled: bool) -> Self {
        self.config.statistics = enabled;
        self
    }

    /// Set the partition assignment mode
    pub fn partition_mode(mut self, mode: PartitionMode) -> Self {
        self.config.partition_mode = mode;
        self
    }

    /// Set the target partition size for auto mode (in bytes)
    pub fn auto_partition_bytes(mut self, bytes: u64) -> Self {
        self.config.auto_partition_bytes = bytes;
        self
    }

    pub fn build(self) -> ScanConfig {
        self.config
    }
}
