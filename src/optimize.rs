use tracing::debug;

use crate::datatype::Scalar;
use crate::query::Query;

// Which operator joins the equality tests collected so far. A run of one
// leaf has no kind yet; it adopts the kind of the first operator above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Intersection,
    Union,
}

struct EqRun {
    index: String,
    values: Vec<Scalar>,
    kind: Option<RunKind>,
}

/// Rewrites runs of equality tests on one index into a single batched
/// membership test.
///
/// `Eq` leaves on the same index, joined transitively through operators of a
/// single kind, are equivalent to one `All` (intersection runs) or `Any`
/// (union runs) over the collected values, and an index can usually answer
/// the batched form far more cheaply than N separate lookups merged one by
/// one. Values keep their left-to-right, depth-first order, since an index
/// may be order-sensitive for tie-breaking.
///
/// Runs of a single leaf, mixed operator kinds and non-`Eq` comparators are
/// left untouched. The pass is pure: it consumes the tree and builds the
/// rewritten one bottom-up, never touching a catalog, and applying it twice
/// changes nothing.
pub fn optimize(tree: Query) -> Query {
    let (tree, run) = visit(tree);
    collapse(tree, run)
}

// Post-order: returns the rebuilt subtree along with the equality run it
// contributes to its parent, if any.
fn visit(node: Query) -> (Query, Option<EqRun>) {
    match node {
        Query::Eq { index, value } => {
            let run = EqRun {
                index: index.clone(),
                values: vec![value.clone()],
                kind: None,
            };
            (Query::Eq { index, value }, Some(run))
        }
        Query::Intersection(left, right) => join(*left, *right, RunKind::Intersection),
        Query::Union(left, right) => join(*left, *right, RunKind::Union),
        Query::Difference(left, right) => {
            let (left, left_run) = visit(*left);
            let (right, right_run) = visit(*right);
            let left = collapse(left, left_run);
            let right = collapse(right, right_run);
            (Query::Difference(Box::new(left), Box::new(right)), None)
        }
        leaf => (leaf, None),
    }
}

fn join(left: Query, right: Query, kind: RunKind) -> (Query, Option<EqRun>) {
    let (left, left_run) = visit(left);
    let (right, right_run) = visit(right);
    match (left_run, right_run) {
        // both sides carry a run on the same index and neither was joined by
        // the other operator kind, so the runs merge and propagate upward
        (Some(l), Some(r))
            if l.index == r.index
                && l.kind.unwrap_or(kind) == kind
                && r.kind.unwrap_or(kind) == kind =>
        {
            let mut values = l.values;
            values.extend(r.values);
            let run = EqRun {
                index: l.index,
                values,
                kind: Some(kind),
            };
            (rebuild(left, right, kind), Some(run))
        }
        // the run ends here: batch whichever side collected enough and
        // report nothing upward
        (left_run, right_run) => {
            let left = collapse(left, left_run);
            let right = collapse(right, right_run);
            (rebuild(left, right, kind), None)
        }
    }
}

fn rebuild(left: Query, right: Query, kind: RunKind) -> Query {
    match kind {
        RunKind::Intersection => Query::Intersection(Box::new(left), Box::new(right)),
        RunKind::Union => Query::Union(Box::new(left), Box::new(right)),
    }
}

fn collapse(node: Query, run: Option<EqRun>) -> Query {
    match run {
        Some(EqRun {
            index,
            values,
            kind: Some(kind),
        }) if values.len() > 1 => {
            debug!(index = %index, count = values.len(), ?kind, "batching equality run");
            match kind {
                RunKind::Intersection => Query::All { index, values },
                RunKind::Union => Query::Any { index, values },
            }
        }
        _ => node,
    }
}
