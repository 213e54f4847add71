//! # flowscan
//!
//! A read-only scan engine for Cisco NetFlow export files (v5/v7), built
//! to sit under a distributed query engine:
//! - Declarative per-version binary layouts
//! - Predicate pushdown from a filter tree down to raw byte comparisons
//! - A persisted per-file min/max statistics sidecar
//! - A skip-scan planner that drops whole files without reading records
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Query Layer                            │
//! │        (planner / executor, supplies the filter tree)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     ScanEngine                              │
//! │     plan_scan ──► partitions ──► lazy record streams        │
//! └──────┬──────────────┬──────────────┬───────────────────────┘
//!        │              │              │
//!        ▼              ▼              ▼
//! ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! │   Filter    │ │    Scan     │ │  Statistics │
//! │  Resolver   │ │   Planner   │ │   Sidecar   │
//! └─────────────┘ └──────┬──────┘ └─────────────┘
//!                        │
//!                 ┌──────▼──────┐
//!                 │Header Parser│
//!                 │Record Decode│
//!                 └─────────────┘
//! ```
//!
//! Skipping is an optimization, never a filter: every yielded record has
//! passed row-level evaluation of the full filter tree, and a file is
//! only skipped when its statistics prove no record can match.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod format;
pub mod scan;
pub mod stats;
pub mod filter;
pub mod plan;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlowError, Result};
pub use config::{PartitionMode, ScanConfig};
pub use engine::{PartitionTask, ScanEngine, ScanPlan};
pub use filter::{CompareOp, FilterExpr, Literal};
pub use format::FormatVersion;
pub use scan::{Record, RowValue};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of flowscan
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
