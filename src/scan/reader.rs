//! Record Stream
//!
//! Streams decoded records for one scan assignment: a sequential
//! header-then-records pass over the assignment's byte range, with the
//! row-level filter applied as the final correctness check and an optional
//! statistics fold over every decoded record.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{FlowError, Result};
use crate::filter::FilterExpr;
use crate::format::RecordLayout;
use crate::plan::ScanAssignment;
use crate::stats::{self, StatisticsBuilder};
use crate::store::ByteStore;

use super::{Record, RecordDecoder};

// =============================================================================
// Stream
// =============================================================================

/// Lazy, finite, non-restartable record sequence for one assignment
pub struct RecordStream {
    decoder: RecordDecoder,
    filter: Option<Arc<FilterExpr>>,
    source: Source,
    /// Records left to decode out of the assignment's range
    remaining: u64,
    stats: Option<StatsSink>,
    done: bool,
}

enum Source {
    /// Uncompressed: bounded sequential reads, one record at a time
    Sequential {
        reader: Box<dyn Read + Send>,
        block: Vec<u8>,
    },
    /// Compressed: the whole record section, decompressed up front
    Buffered { data: Vec<u8>, pos: usize },
}

/// Deferred sidecar write, performed once the stream ends cleanly
struct StatsSink {
    builder: StatisticsBuilder,
    store: Arc<dyn ByteStore>,
    data_path: PathBuf,
}

impl RecordStream {
    /// Open a stream over one assignment's byte range.
    ///
    /// For a compressed file the record section is one lz4 block with a
    /// prepended uncompressed size; decompression failure is fatal for the
    /// file (`CorruptData`) but not for the rest of the scan.
    pub fn open(
        store: &Arc<dyn ByteStore>,
        assignment: &ScanAssignment,
        layout: &'static RecordLayout,
        filter: Option<Arc<FilterExpr>>,
    ) -> Result<RecordStream> {
        let file = &assignment.file;
        let header = &file.header;
        let width = layout.record_width as u64;
        let decoder = RecordDecoder::new(layout, header.byte_order);
        let remaining = assignment.end_record - assignment.start_record;

        let source = if header.is_compressed() {
            // The partitioner never range-subdivides compressed files.
            debug_assert!(assignment.covers_whole_file());

            let mut reader = store.open(&file.path, header.header_len as u64, None)?;
            let mut compressed = Vec::new();
            reader.read_to_end(&mut compressed)?;

            let data = lz4_flex::decompress_size_prepended(&compressed)
                .map_err(|e| FlowError::CorruptData(format!("lz4 decompression failed: {}", e)))?;
            Source::Buffered { data, pos: 0 }
        } else {
            let offset = header.header_len as u64 + assignment.start_record * width;
            let reader = store.open(&file.path, offset, Some(remaining * width))?;
            Source::Sequential {
                reader,
                block: vec![0u8; width as usize],
            }
        };

        let stats = if assignment.collect_stats {
            Some(StatsSink {
                builder: StatisticsBuilder::new(layout),
                store: Arc::clone(store),
                data_path: file.path.clone(),
            })
        } else {
            None
        };

        Ok(RecordStream {
            decoder,
            filter,
            source,
            remaining,
            stats,
            done: false,
        })
    }

    /// Produce the next decoded record block, or None at clean end
    fn next_block(&mut self) -> Option<Result<Record>> {
        let width = self.decoder.record_width();

        match &mut self.source {
            Source::Sequential { reader, block } => {
                let mut filled = 0;
                while filled < width {
                    match reader.read(&mut block[filled..]) {
                        Ok(0) => break,
                        Ok(n) => filled += n,
                        Err(e) => return Some(Err(FlowError::Io(e))),
                    }
                }
                if filled == 0 {
                    return None;
                }
                if filled < width {
                    return Some(Err(FlowError::TruncatedRecord {
                        expected: width,
                        actual: filled,
                    }));
                }
                Some(self.decoder.decode(block))
            }
            Source::Buffered { data, pos } => {
                let available = data.len() - *pos;
                if available == 0 {
                    return None;
                }
                if available < width {
                    return Some(Err(FlowError::TruncatedRecord {
                        expected: width,
                        actual: available,
                    }));
                }
                let record = self.decoder.decode(&data[*pos..*pos + width]);
                *pos += width;
                Some(record)
            }
        }
    }

    /// Stream ended cleanly: persist collected statistics, if any.
    /// Persist failure is logged and swallowed; statistics are advisory.
    fn finish(&mut self) {
        if let Some(sink) = self.stats.take() {
            let entry = sink.builder.finish();
            match stats::persist(sink.store.as_ref(), &sink.data_path, &entry) {
                Ok(()) => tracing::debug!(
                    file = %sink.data_path.display(),
                    records = entry.record_count,
                    "persisted statistics sidecar"
                ),
                Err(e) => tracing::warn!(
                    file = %sink.data_path.display(),
                    error = %e,
                    "failed to persist statistics sidecar"
                ),
            }
        }
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.remaining == 0 {
                self.done = true;
                self.finish();
                return None;
            }

            let record = match self.next_block() {
                None => {
                    // The range promised more records than the file holds.
                    // An exact record boundary still means missing data.
                    self.done = true;
                    self.stats = None;
                    return Some(Err(FlowError::CorruptData(
                        "file ends before declared record count".into(),
                    )));
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.stats = None;
                    return Some(Err(e));
                }
                Some(Ok(record)) => record,
            };

            self.remaining -= 1;

            // Statistics describe the whole file, so fold before filtering.
            if let Some(sink) = &mut self.stats {
                sink.builder.fold(&record);
            }

            match &self.filter {
                Some(filter) if !filter.evaluate(&record) => continue,
                _ => return Some(Ok(record)),
            }
        }
    }
}
