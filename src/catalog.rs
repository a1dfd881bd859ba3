use crate::datatype::{DocId, Scalar};
use crate::resultset::WeightedResultSet;

// ------------- Index -------------
/// One stored index, answering a single comparator kind per method.
///
/// The algebra treats every return value as opaque: whatever set an index
/// hands back for a comparator is merged as-is, with no further per-document
/// computation. How a comparator is answered (B-tree walk, full-text scan,
/// bitmap probe) is entirely up to the implementation, as is the weight it
/// assigns to each match (most indexes emit weight 1).
pub trait Index {
    fn apply_eq(&self, value: &Scalar) -> WeightedResultSet;
    fn apply_not_eq(&self, value: &Scalar) -> WeightedResultSet;
    fn apply_gt(&self, value: &Scalar) -> WeightedResultSet;
    fn apply_lt(&self, value: &Scalar) -> WeightedResultSet;
    fn apply_ge(&self, value: &Scalar) -> WeightedResultSet;
    fn apply_le(&self, value: &Scalar) -> WeightedResultSet;
    fn apply_contains(&self, value: &Scalar) -> WeightedResultSet;
    /// Batched membership: documents matching at least one of `values`.
    fn apply_any(&self, values: &[Scalar]) -> WeightedResultSet;
    /// Batched membership: documents matching every one of `values`.
    fn apply_all(&self, values: &[Scalar]) -> WeightedResultSet;
}

// ------------- Catalog -------------
/// Maps index names to indexes and performs final result sorting/paging.
/// Safe concurrent reads are the implementor's responsibility; the algebra
/// only ever reads.
pub trait Catalog {
    fn lookup_index(&self, name: &str) -> Option<&dyn Index>;
    fn sort_result(&self, results: &WeightedResultSet, spec: &SortSpec) -> Vec<DocId>;
}

// ------------- SortSpec -------------
/// Sorting hint passed through to the catalog. `Stable` asks for a full
/// stable sort, `Optimal` lets the catalog pick an n-best strategy when a
/// limit is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortType {
    #[default]
    Stable,
    Optimal,
}

#[derive(Debug, Clone, Default)]
pub struct SortSpec {
    pub sort_index: Option<String>,
    pub limit: Option<usize>,
    pub sort_type: SortType,
    pub reverse: bool,
}
