//! Plan Module
//!
//! Per-file scan strategy (full vs. skip) and grouping of surviving files
//! into parallel work units.

mod partition;
mod planner;

pub use partition::{plan_partitions, FileMeta, Partition, ScanAssignment};
pub use planner::{plan, ScanStrategy};
