//! Filter Module
//!
//! The query layer hands the engine one boolean filter tree per query.
//! The tree is a closed set of tagged variants rather than an open
//! expression hierarchy, so both the resolver and the planner can be
//! checked by exhaustive case analysis.
//!
//! Row-level evaluation of the full tree is the correctness backstop:
//! whatever the resolver manages to push down, every yielded record has
//! passed [`FilterExpr::evaluate`].

mod resolver;

pub use resolver::{resolve, PredicateOp, ResolvedPredicate};

use crate::format::{protocol_number, FieldSpec, SemanticKind};
use crate::scan::Record;

// =============================================================================
// Filter Tree
// =============================================================================

/// A comparison operator on a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

/// A filter literal as supplied by the query layer.
///
/// Text literals are converted to the column's native representation on
/// demand: `"0.0.0.10"` for an address column, `"UDP"` for a protocol
/// column, plain digits anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Unsigned(u64),
    Text(String),
}

/// Boolean filter tree over flow columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    And(Vec<FilterExpr>),
    Or(Vec<FilterExpr>),
    Not(Box<FilterExpr>),
    Compare {
        column: String,
        op: CompareOp,
        literal: Literal,
    },
    In {
        column: String,
        literals: Vec<Literal>,
    },
    IsNull {
        column: String,
    },
}

impl FilterExpr {
    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    pub fn compare(column: impl Into<String>, op: CompareOp, literal: Literal) -> Self {
        FilterExpr::Compare {
            column: column.into(),
            op,
            literal,
        }
    }

    pub fn eq(column: impl Into<String>, literal: Literal) -> Self {
        Self::compare(column, CompareOp::Eq, literal)
    }

    pub fn and(exprs: Vec<FilterExpr>) -> Self {
        FilterExpr::And(exprs)
    }

    // -------------------------------------------------------------------------
    // Row-level Evaluation
    // -------------------------------------------------------------------------

    /// Evaluate the full tree against one decoded record.
    ///
    /// Comparisons run in the u64 domain, so a literal wider than the
    /// field (e.g. `protocol < 300`) still compares correctly even though
    /// the resolver refuses to push it down. A leaf naming an unknown
    /// column, or carrying a literal that cannot be converted, matches
    /// nothing.
    pub fn evaluate(&self, record: &Record) -> bool {
        match self {
            FilterExpr::And(children) => children.iter().all(|c| c.evaluate(record)),
            FilterExpr::Or(children) => children.iter().any(|c| c.evaluate(record)),
            FilterExpr::Not(inner) => !inner.evaluate(record),
            FilterExpr::Compare {
                column,
                op,
                literal,
            } => {
                let (value, lit) = match leaf_operands(record, column, literal) {
                    Some(pair) => pair,
                    None => return false,
                };
                match op {
                    CompareOp::Eq => value == lit,
                    CompareOp::Gt => value > lit,
                    CompareOp::Ge => value >= lit,
                    CompareOp::Lt => value < lit,
                    CompareOp::Le => value <= lit,
                }
            }
            FilterExpr::In { column, literals } => literals
                .iter()
                .any(|l| matches!(leaf_operands(record, column, l), Some((v, lit)) if v == lit)),
            // Fixed-width records carry a value in every field.
            FilterExpr::IsNull { .. } => false,
        }
    }
}

fn leaf_operands(record: &Record, column: &str, literal: &Literal) -> Option<(u64, u64)> {
    let spec = record.layout().field(column)?;
    let value = record.value(column)?;
    let lit = literal_to_native(literal, spec)?;
    Some((value, lit))
}

// =============================================================================
// Literal Conversion
// =============================================================================

/// Convert a query literal to the field's native integer representation.
///
/// Returns None when the literal has no native form for this field; the
/// resolver drops such leaves from pushdown and row evaluation treats them
/// as matching nothing.
pub(crate) fn literal_to_native(literal: &Literal, spec: &FieldSpec) -> Option<u64> {
    match literal {
        Literal::Unsigned(v) => Some(*v),
        Literal::Text(s) => match spec.kind {
            SemanticKind::Ipv4Addr => s
                .parse::<std::net::Ipv4Addr>()
                .ok()
                .map(|addr| u32::from(addr) as u64)
                .or_else(|| s.parse::<u64>().ok()),
            SemanticKind::Protocol => protocol_number(s).or_else(|| s.parse::<u64>().ok()),
            _ => s.parse::<u64>().ok(),
        },
    }
}
