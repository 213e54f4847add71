//! Engine Module
//!
//! The scan coordinator that ties all components together.
//!
//! ## Responsibilities
//! - Plan a scan: read headers, consult statistics, skip disproven files,
//!   group survivors into partitions
//! - Serve each partition as a lazy record stream
//! - Run all partitions on isolated workers for convenience consumers
//!
//! ## Control Flow
//! ```text
//! paths ──► header parse ──► FileMeta
//!                │
//!                ▼
//!   statistics sidecar ◄── cache (per process, lazy)
//!                │
//!                ▼
//!        scan planner ──► SkipScan? drop file, read zero record bytes
//!                │
//!                ▼
//!         partitioner ──► partitions ──► RecordStream per assignment
//! ```

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::ScanConfig;
use crate::error::{FlowError, Result};
use crate::filter::{resolve, FilterExpr, ResolvedPredicate};
use crate::format::{layout_for, RecordLayout};
use crate::plan::{plan, plan_partitions, FileMeta, Partition, ScanAssignment, ScanStrategy};
use crate::scan::{FileHeader, Record, RecordStream, RowValue};
use crate::stats::{self, StatisticsEntry};
use crate::store::{ByteStore, LocalFileStore};

// =============================================================================
// Scan Plan
// =============================================================================

/// One plannable work unit of a scan
#[derive(Debug, Clone)]
pub enum PartitionTask {
    /// Assignments to stream records from
    Scan(Partition),
    /// A file whose header could not be read at planning time. The task
    /// fails when scanned; the file is reported, never silently dropped.
    Failed { path: PathBuf, message: String },
}

/// The immutable output of scan planning
pub struct ScanPlan {
    pub layout: &'static RecordLayout,
    pub filter: Option<Arc<FilterExpr>>,
    /// Predicates that were pushed down (advisory; the filter tree is
    /// still evaluated per record)
    pub predicates: Vec<ResolvedPredicate>,
    pub tasks: Vec<PartitionTask>,
    /// Files proven empty by statistics; zero record bytes read
    pub skipped_files: usize,
}

impl ScanPlan {
    pub fn partition_count(&self) -> usize {
        self.tasks.len()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The scan engine.
///
/// ## Concurrency Model
///
/// Partitions are embarrassingly parallel: each worker owns its streams
/// and shares nothing mutable. The only shared state is the per-process
/// header/statistics cache behind an RwLock, populated at planning time.
pub struct ScanEngine {
    config: ScanConfig,
    store: Arc<dyn ByteStore>,
    /// Successfully loaded sidecars, cached for the engine's lifetime.
    /// Misses are not cached: a statistics-enabled scan may persist a
    /// sidecar between plans, and the next plan must see it.
    stats_cache: RwLock<HashMap<PathBuf, Arc<StatisticsEntry>>>,
}

impl ScanEngine {
    /// Create an engine over the local filesystem
    pub fn new(config: ScanConfig) -> Self {
        Self::with_store(config, Arc::new(LocalFileStore::new()))
    }

    /// Create an engine over an injected byte store
    pub fn with_store(config: ScanConfig, store: Arc<dyn ByteStore>) -> Self {
        Self {
            config,
            store,
            stats_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Materialize a record as a field-name → value row, stringifying
    /// semantic fields per the configured `stringify` setting
    pub fn materialize(&self, record: &Record) -> Vec<(&'static str, RowValue)> {
        record.row(self.config.stringify)
    }

    // -------------------------------------------------------------------------
    // Planning
    // -------------------------------------------------------------------------

    /// Plan a scan over a set of files.
    ///
    /// Steps:
    /// 1. Resolve the layout for the configured version — an unsupported
    ///    version fails the whole query here, before any file is touched
    /// 2. Resolve the filter tree into pushdown predicates
    /// 3. Per file: parse the header, consult cached statistics, and drop
    ///    files the planner proves empty
    /// 4. Partition the survivors and mark statistics-collection targets
    pub fn plan_scan(&self, paths: &[PathBuf], filter: Option<FilterExpr>) -> Result<ScanPlan> {
        let layout = layout_for(self.config.version)?;

        let filter = filter.map(Arc::new);
        let predicates = filter
            .as_ref()
            .map(|f| resolve(f, layout))
            .unwrap_or_default();

        let mut survivors: Vec<Arc<FileMeta>> = Vec::new();
        let mut failed: Vec<PartitionTask> = Vec::new();
        let mut skipped_files = 0;

        for path in paths {
            let meta = match self.file_meta(path, layout) {
                Ok(meta) => meta,
                // No layout exists to interpret any file; fail the query.
                Err(e @ FlowError::UnsupportedVersion(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "file failed header validation");
                    failed.push(PartitionTask::Failed {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let file_stats = if self.config.statistics {
                self.cached_stats(path)
            } else {
                None
            };

            match plan(&predicates, file_stats.as_deref()) {
                ScanStrategy::SkipScan => {
                    tracing::debug!(file = %path.display(), "skip scan: statistics disprove filter");
                    skipped_files += 1;
                }
                ScanStrategy::FullScan => survivors.push(Arc::new(meta)),
            }
        }

        let mut partitions = plan_partitions(
            &survivors,
            self.config.partition_mode,
            self.config.auto_partition_bytes,
        );

        if self.config.statistics {
            self.mark_stats_collection(&mut partitions);
        }

        let mut tasks = failed;
        tasks.extend(partitions.into_iter().map(PartitionTask::Scan));

        Ok(ScanPlan {
            layout,
            filter,
            predicates,
            tasks,
            skipped_files,
        })
    }

    /// Read and validate one file's header, without touching record bytes
    fn file_meta(&self, path: &Path, layout: &'static RecordLayout) -> Result<FileMeta> {
        let file_size = self.store.len(path)?;
        let mut reader = self.store.open(path, 0, None)?;
        let header = FileHeader::parse(reader.as_mut())?;

        if header.version != self.config.version {
            return Err(FlowError::MalformedHeader(format!(
                "file declares {}, scan configured for {}",
                header.version, self.config.version
            )));
        }

        Ok(FileMeta {
            path: path.to_path_buf(),
            header,
            file_size,
            record_width: layout.record_width,
        })
    }

    /// Load a file's statistics through the process-wide cache.
    ///
    /// Only successful loads are cached; a miss re-checks the store on the
    /// next plan, so sidecars built by this engine's own scans are picked
    /// up as soon as they exist.
    fn cached_stats(&self, path: &Path) -> Option<Arc<StatisticsEntry>> {
        if let Some(entry) = self.stats_cache.read().get(path) {
            return Some(Arc::clone(entry));
        }

        let loaded = stats::load(self.store.as_ref(), path).map(Arc::new);
        if let Some(entry) = &loaded {
            self.stats_cache
                .write()
                .insert(path.to_path_buf(), Arc::clone(entry));
        }
        loaded
    }

    /// Mark whole-file assignments of files without a sidecar for
    /// statistics collection during the scan
    fn mark_stats_collection(&self, partitions: &mut [Partition]) {
        for partition in partitions {
            for assignment in &mut partition.assignments {
                if assignment.covers_whole_file()
                    && !self
                        .store
                        .exists(&stats::sidecar_path(&assignment.file.path))
                {
                    assignment.collect_stats = true;
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------

    /// Stream one partition's records lazily.
    ///
    /// A fatal file error (malformed header, truncation, corrupt data)
    /// fails the whole partition: the stream yields the error and ends.
    pub fn scan_partition(&self, plan: &ScanPlan, index: usize) -> Result<PartitionStream> {
        let task = plan
            .tasks
            .get(index)
            .ok_or_else(|| FlowError::Config(format!("no partition at index {}", index)))?;

        match task {
            PartitionTask::Failed { message, .. } => {
                Err(FlowError::MalformedHeader(message.clone()))
            }
            PartitionTask::Scan(partition) => Ok(PartitionStream {
                store: Arc::clone(&self.store),
                layout: plan.layout,
                filter: plan.filter.clone(),
                pending: partition.assignments.iter().cloned().collect(),
                current: None,
                done: false,
            }),
        }
    }

    /// Run every partition on its own worker and collect all matching
    /// records. Convenience wrapper for consumers that do not stream;
    /// the first partition failure fails the scan.
    pub fn scan_collect(&self, plan: &ScanPlan) -> Result<Vec<Record>> {
        let (tx, rx) = crossbeam::channel::unbounded::<Result<Record>>();

        crossbeam::thread::scope(|scope| {
            for index in 0..plan.tasks.len() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    match self.scan_partition(plan, index) {
                        Ok(stream) => {
                            for item in stream {
                                if tx.send(item).is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e));
                        }
                    };
                });
            }
            drop(tx);

            let mut records = Vec::new();
            let mut first_error = None;
            for item in rx {
                match item {
                    Ok(record) => records.push(record),
                    Err(e) if first_error.is_none() => first_error = Some(e),
                    Err(_) => {}
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(records),
            }
        })
        .map_err(|_| FlowError::Config("scan worker panicked".into()))?
    }
}

// =============================================================================
// Partition Stream
// =============================================================================

/// Lazy record sequence over one partition's assignments, in order
pub struct PartitionStream {
    store: Arc<dyn ByteStore>,
    layout: &'static RecordLayout,
    filter: Option<Arc<FilterExpr>>,
    pending: VecDeque<ScanAssignment>,
    current: Option<RecordStream>,
    done: bool,
}

impl Iterator for PartitionStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(stream) = &mut self.current {
                match stream.next() {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(e)) => {
                        // Fatal for the file, and the partition with it.
                        self.done = true;
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
                continue;
            }

            match self.pending.pop_front() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(assignment) => {
                    match RecordStream::open(
                        &self.store,
                        &assignment,
                        self.layout,
                        self.filter.clone(),
                    ) {
                        Ok(stream) => self.current = Some(stream),
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
    }
}
