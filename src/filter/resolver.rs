//! Filter Resolver
//!
//! Rewrites the query-level filter tree into column-level predicates in the
//! file's native representation, for the scan planner to test against
//! per-file statistics.
//!
//! Only the conjunctive spine of the tree is translated. Disjunctions,
//! negations, unknown columns, unconvertible literals, and literals wider
//! than the field's native width are all dropped from pushdown — never an
//! error, because the full tree is re-evaluated row-by-row downstream.

use crate::filter::{literal_to_native, CompareOp, FilterExpr, Literal};
use crate::format::{FieldSpec, RecordLayout};

// =============================================================================
// Resolved Predicates
// =============================================================================

/// A pushed-down operator with its native-representation operand(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateOp {
    Eq(u64),
    Gt(u64),
    Ge(u64),
    Lt(u64),
    Le(u64),
    In(Vec<u64>),
    IsNull,
}

/// One column-level constraint; the full pushdown is their conjunction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPredicate {
    pub field: &'static str,
    pub op: PredicateOp,
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a filter tree against a record layout.
///
/// Returns the (possibly empty) list of predicates that could be safely
/// translated. An empty list simply means nothing was pushed down.
pub fn resolve(expr: &FilterExpr, layout: &'static RecordLayout) -> Vec<ResolvedPredicate> {
    let mut predicates = Vec::new();
    collect(expr, layout, &mut predicates);
    predicates
}

fn collect(expr: &FilterExpr, layout: &'static RecordLayout, out: &mut Vec<ResolvedPredicate>) {
    match expr {
        FilterExpr::And(children) => {
            for child in children {
                collect(child, layout, out);
            }
        }
        FilterExpr::Compare {
            column,
            op,
            literal,
        } => {
            if let Some((spec, value)) = convert_leaf(layout, column, literal) {
                out.push(ResolvedPredicate {
                    field: spec.name,
                    op: match op {
                        CompareOp::Eq => PredicateOp::Eq(value),
                        CompareOp::Gt => PredicateOp::Gt(value),
                        CompareOp::Ge => PredicateOp::Ge(value),
                        CompareOp::Lt => PredicateOp::Lt(value),
                        CompareOp::Le => PredicateOp::Le(value),
                    },
                });
            }
        }
        FilterExpr::In { column, literals } => {
            // Push only when every member converts; a partial set would
            // narrow the match and could skip files that contain rows
            // matching the dropped members.
            let mut values = Vec::with_capacity(literals.len());
            for literal in literals {
                match convert_leaf(layout, column, literal) {
                    Some((_, value)) => values.push(value),
                    None => return,
                }
            }
            if let Some(spec) = layout.field(column) {
                out.push(ResolvedPredicate {
                    field: spec.name,
                    op: PredicateOp::In(values),
                });
            }
        }
        FilterExpr::IsNull { column } => {
            if let Some(spec) = layout.field(column) {
                out.push(ResolvedPredicate {
                    field: spec.name,
                    op: PredicateOp::IsNull,
                });
            }
        }
        // A disjunction or negation cannot be expressed as a per-column
        // range without risking a false skip; the row filter handles it.
        FilterExpr::Or(_) | FilterExpr::Not(_) => {}
    }
}

/// Convert one column/literal pair, enforcing the field's native width.
///
/// A literal outside the width (e.g. 70000 against a u16 port) is dropped
/// from pushdown rather than clamped; the row-level filter still applies.
fn convert_leaf<'a>(
    layout: &'a RecordLayout,
    column: &str,
    literal: &Literal,
) -> Option<(&'a FieldSpec, u64)> {
    let spec = layout.field(column)?;
    let value = literal_to_native(literal, spec)?;
    if value > spec.max_native() {
        return None;
    }
    Some((spec, value))
}
