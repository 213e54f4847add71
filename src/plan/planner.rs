//! Scan Planner
//!
//! Decides per file whether record content needs to be read at all.
//!
//! Skip scan is one-sided: the planner may miss a skip opportunity (no
//! statistics, unresolved predicate), but a SkipScan verdict is a proof —
//! some conjoined predicate is unsatisfiable over the file's [min, max],
//! so no record in the file can satisfy the full filter. A file must never
//! be skipped while it contains a matching record.

use crate::filter::{PredicateOp, ResolvedPredicate};
use crate::stats::StatisticsEntry;

/// Per-file scan decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Open the file and decode records
    FullScan,
    /// Read zero bytes of record content
    SkipScan,
}

/// Decide the strategy for one file.
///
/// With no statistics the answer is always FullScan. With statistics, one
/// disproved predicate suffices because predicates are conjoined.
pub fn plan(predicates: &[ResolvedPredicate], stats: Option<&StatisticsEntry>) -> ScanStrategy {
    let stats = match stats {
        Some(s) => s,
        None => return ScanStrategy::FullScan,
    };

    for predicate in predicates {
        let column = match stats.column(predicate.field) {
            Some(c) => c,
            // Statistics predate this column or were built differently;
            // no conclusion possible from this predicate.
            None => continue,
        };

        let unsatisfiable = match &predicate.op {
            PredicateOp::Eq(v) => *v < column.min || *v > column.max,
            PredicateOp::Gt(v) => *v >= column.max,
            PredicateOp::Ge(v) => *v > column.max,
            PredicateOp::Lt(v) => *v <= column.min,
            PredicateOp::Le(v) => *v < column.min,
            PredicateOp::In(vs) => vs.iter().all(|v| *v < column.min || *v > column.max),
            PredicateOp::IsNull => !column.has_null,
        };

        if unsatisfiable {
            tracing::debug!(
                field = predicate.field,
                min = column.min,
                max = column.max,
                "predicate unsatisfiable over file statistics, skipping file"
            );
            return ScanStrategy::SkipScan;
        }
    }

    ScanStrategy::FullScan
}
