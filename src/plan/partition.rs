//! Partitioner
//!
//! Groups files (or record ranges within large files) into independent
//! work units. Compressed files are never range-subdivided: their record
//! section is one opaque block, so they are always assigned whole.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::PartitionMode;
use crate::scan::FileHeader;

// =============================================================================
// File Metadata
// =============================================================================

/// Everything the partitioner and scanner need to know about one file,
/// gathered once at planning time
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub path: PathBuf,
    pub header: FileHeader,
    /// Total file size in bytes
    pub file_size: u64,
    /// Fixed record width for the file's version
    pub record_width: usize,
}

impl FileMeta {
    /// Declared number of records
    pub fn record_count(&self) -> u64 {
        self.header.record_count as u64
    }
}

// =============================================================================
// Assignments and Partitions
// =============================================================================

/// A contiguous record range of one file assigned to a worker
#[derive(Debug, Clone)]
pub struct ScanAssignment {
    pub file: Arc<FileMeta>,
    /// First record index (inclusive)
    pub start_record: u64,
    /// Last record index (exclusive)
    pub end_record: u64,
    /// Build and persist a statistics sidecar while scanning. Set by the
    /// engine only on whole-file assignments.
    pub collect_stats: bool,
}

impl ScanAssignment {
    fn whole(file: Arc<FileMeta>) -> Self {
        let end = file.record_count();
        Self {
            file,
            start_record: 0,
            end_record: end,
            collect_stats: false,
        }
    }

    /// Whether this assignment covers the file end to end
    pub fn covers_whole_file(&self) -> bool {
        self.start_record == 0 && self.end_record == self.file.record_count()
    }

    /// Approximate record-section bytes this assignment will read
    pub fn byte_size(&self) -> u64 {
        (self.end_record - self.start_record) * self.file.record_width as u64
    }
}

/// One parallel work unit: an ordered list of assignments
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub assignments: Vec<ScanAssignment>,
}

impl Partition {
    /// Total record-section bytes across assignments
    pub fn byte_size(&self) -> u64 {
        self.assignments.iter().map(|a| a.byte_size()).sum()
    }
}

// =============================================================================
// Partition Planning
// =============================================================================

/// Assign files to partitions according to the configured mode.
///
/// `auto_target_bytes` only applies to `PartitionMode::Auto`.
pub fn plan_partitions(
    files: &[Arc<FileMeta>],
    mode: PartitionMode,
    auto_target_bytes: u64,
) -> Vec<Partition> {
    match mode {
        PartitionMode::PerFile => per_file(files),
        PartitionMode::FixedCount(count) => fixed_count(files, count.max(1)),
        PartitionMode::Auto => auto(files, auto_target_bytes.max(1)),
    }
}

fn per_file(files: &[Arc<FileMeta>]) -> Vec<Partition> {
    files
        .iter()
        .map(|file| Partition {
            assignments: vec![ScanAssignment::whole(Arc::clone(file))],
        })
        .collect()
}

/// Greedy bin-packing: largest file first into the currently lightest bin.
fn fixed_count(files: &[Arc<FileMeta>], count: usize) -> Vec<Partition> {
    let count = count.min(files.len()).max(1);
    let mut bins: Vec<Partition> = (0..count).map(|_| Partition::default()).collect();

    let mut ordered: Vec<&Arc<FileMeta>> = files.iter().collect();
    ordered.sort_by_key(|f| std::cmp::Reverse(f.file_size));

    for file in ordered {
        let lightest = bins
            .iter_mut()
            .min_by_key(|b| b.byte_size())
            .expect("at least one bin");
        lightest
            .assignments
            .push(ScanAssignment::whole(Arc::clone(file)));
    }

    bins.retain(|b| !b.assignments.is_empty());
    bins
}

/// Size heuristic: whole-file partitions, except large uncompressed files,
/// which are split into record-aligned ranges near the target size.
fn auto(files: &[Arc<FileMeta>], target_bytes: u64) -> Vec<Partition> {
    let mut partitions = Vec::new();

    for file in files {
        let record_bytes = file.record_count() * file.record_width as u64;
        if file.header.is_compressed() || record_bytes <= target_bytes {
            partitions.push(Partition {
                assignments: vec![ScanAssignment::whole(Arc::clone(file))],
            });
            continue;
        }

        let records_per_split = (target_bytes / file.record_width as u64).max(1);
        let mut start = 0;
        while start < file.record_count() {
            let end = (start + records_per_split).min(file.record_count());
            partitions.push(Partition {
                assignments: vec![ScanAssignment {
                    file: Arc::clone(file),
                    start_record: start,
                    end_record: end,
                    collect_stats: false,
                }],
            });
            start = end;
        }
    }

    partitions
}
