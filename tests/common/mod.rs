#![allow(dead_code)]

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Once;

use docket::catalog::{Catalog, Index, SortSpec};
use docket::datatype::{DocId, Scalar};
use docket::resultset::WeightedResultSet;

static TRACING: Once = Once::new();

/// Routes the crate's debug/trace events to the test output, filtered by
/// RUST_LOG. Safe to call from every fixture; only the first call installs
/// the subscriber.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A single-field in-memory index mapping stored values to document ids,
/// emitting weight 1 per match. Counts how often it was consulted so tests
/// can observe evaluation short-circuits.
pub struct FieldIndex {
    entries: Vec<(Scalar, Vec<DocId>)>,
    calls: Cell<usize>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            calls: Cell::new(0),
        }
    }

    pub fn put(mut self, value: impl Into<Scalar>, docs: &[DocId]) -> Self {
        self.entries.push((value.into(), docs.to_vec()));
        self
    }

    /// How many apply_* calls this index has answered.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn matching(&self, pred: impl Fn(&Scalar) -> bool) -> WeightedResultSet {
        let mut set = WeightedResultSet::new();
        for (value, docs) in &self.entries {
            if pred(value) {
                for &doc in docs {
                    set.insert(doc, 1.0);
                }
            }
        }
        set
    }

    fn eq_set(&self, probe: &Scalar) -> WeightedResultSet {
        self.matching(|v| v == probe)
    }
}

fn order(stored: &Scalar, probe: &Scalar) -> Option<Ordering> {
    match (stored, probe) {
        (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
        (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
        (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
        (Scalar::Int(a), Scalar::Float(b)) => (*a as f64).partial_cmp(b),
        (Scalar::Float(a), Scalar::Int(b)) => a.partial_cmp(&(*b as f64)),
        _ => None,
    }
}

impl Index for FieldIndex {
    fn apply_eq(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.eq_set(value)
    }
    fn apply_not_eq(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.matching(|v| v != value)
    }
    fn apply_gt(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.matching(|v| order(v, value) == Some(Ordering::Greater))
    }
    fn apply_lt(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.matching(|v| order(v, value) == Some(Ordering::Less))
    }
    fn apply_ge(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.matching(|v| matches!(order(v, value), Some(Ordering::Greater | Ordering::Equal)))
    }
    fn apply_le(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.matching(|v| matches!(order(v, value), Some(Ordering::Less | Ordering::Equal)))
    }
    fn apply_contains(&self, value: &Scalar) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        self.matching(|v| match (v, value) {
            (Scalar::Str(stored), Scalar::Str(probe)) => stored.contains(probe.as_str()),
            (stored, probe) => stored == probe,
        })
    }
    fn apply_any(&self, values: &[Scalar]) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        values
            .iter()
            .fold(WeightedResultSet::new(), |acc, probe| {
                acc.weighted_union(&self.eq_set(probe))
            })
    }
    fn apply_all(&self, values: &[Scalar]) -> WeightedResultSet {
        self.calls.set(self.calls.get() + 1);
        let mut result: Option<WeightedResultSet> = None;
        for probe in values {
            let matches = self.eq_set(probe);
            result = Some(match result {
                Some(acc) => acc.weighted_intersection(&matches),
                None => matches,
            });
        }
        result.unwrap_or_default()
    }
}

/// A catalog over named [`FieldIndex`]es. Sorting in this mock is ascending
/// document id with the reverse and limit knobs applied; the sort_index and
/// sort_type hints are accepted and ignored.
pub struct MemCatalog {
    indexes: HashMap<String, FieldIndex>,
}

impl MemCatalog {
    pub fn new() -> Self {
        init_tracing();
        Self {
            indexes: HashMap::new(),
        }
    }

    pub fn with(mut self, name: &str, index: FieldIndex) -> Self {
        self.indexes.insert(name.to_string(), index);
        self
    }

    pub fn index(&self, name: &str) -> &FieldIndex {
        self.indexes.get(name).expect("fixture index exists")
    }
}

impl Catalog for MemCatalog {
    fn lookup_index(&self, name: &str) -> Option<&dyn Index> {
        self.indexes.get(name).map(|index| index as &dyn Index)
    }

    fn sort_result(&self, results: &WeightedResultSet, spec: &SortSpec) -> Vec<DocId> {
        let mut ids: Vec<DocId> = results.doc_ids().collect();
        if spec.reverse {
            ids.reverse();
        }
        if let Some(limit) = spec.limit {
            ids.truncate(limit);
        }
        ids
    }
}

pub fn docs(set: &WeightedResultSet) -> Vec<DocId> {
    set.doc_ids().collect()
}
