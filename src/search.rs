use tracing::debug;

use crate::catalog::{Catalog, SortSpec};
use crate::datatype::DocId;
use crate::error::Result;
use crate::query::Query;
use crate::resultset::WeightedResultSet;

// ------------- Searcher -------------
/// Chainable query refinement over a running result set.
///
/// Each call narrows ([`and`](Searcher::and)), widens ([`or`](Searcher::or))
/// or prunes ([`not`](Searcher::not)) the *current* accumulation and returns
/// the searcher again, so calls chain with `?` between them. Sorting and
/// paging of the final set is the catalog's job, reached through
/// [`finish`](Searcher::finish).
///
/// The chain is order-dependent on purpose. Because every step operates on
/// the accumulation as it stands rather than re-deriving from the full
/// history, documents removed by an earlier `and` or `not` reappear through
/// a later `or` whenever they match its operand. A chain is therefore not
/// the same thing as one big boolean expression over a frozen snapshot; if
/// `not` should be final, call it last.
///
/// A searcher holds sequential mutable state for one request. For concurrent
/// query building, use one searcher per thread.
pub struct Searcher<'a> {
    catalog: &'a dyn Catalog,
    results: Option<WeightedResultSet>,
}

impl<'a> Searcher<'a> {
    /// A searcher with nothing accumulated yet. The first `or` seeds it.
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self {
            catalog,
            results: None,
        }
    }

    /// A searcher seeded by evaluating `query` immediately.
    pub fn with_query(catalog: &'a dyn Catalog, query: &Query) -> Result<Self> {
        let results = query.evaluate(catalog)?;
        Ok(Self {
            catalog,
            results: Some(results),
        })
    }

    /// The current accumulation. A searcher that has accumulated nothing
    /// reads as an empty set, materialized lazily on first access.
    pub fn results(&mut self) -> &WeightedResultSet {
        self.results.get_or_insert_with(WeightedResultSet::new)
    }

    fn is_seeded(&self) -> bool {
        self.results.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Widens the accumulation with the documents matching `query`.
    ///
    /// A non-empty result replaces an empty accumulation outright, which is
    /// what makes the first `or` on a fresh searcher act as a seed; after
    /// that it is a true weighted union.
    pub fn or(&mut self, query: &Query) -> Result<&mut Self> {
        let incoming = query.evaluate(self.catalog)?;
        if !incoming.is_empty() {
            self.results = Some(match self.results.take() {
                Some(current) if !current.is_empty() => current.weighted_union(&incoming),
                _ => incoming,
            });
        }
        Ok(self)
    }

    /// Narrows the accumulation to the documents also matching `query`.
    ///
    /// An already-empty accumulation cannot grow through intersection, so
    /// the argument is not even evaluated. An empty operand empties the
    /// accumulation.
    pub fn and(&mut self, query: &Query) -> Result<&mut Self> {
        if !self.is_seeded() {
            debug!("and on an empty accumulation, operand skipped");
            return Ok(self);
        }
        let incoming = query.evaluate(self.catalog)?;
        self.results = Some(match self.results.take() {
            Some(current) if !incoming.is_empty() => current.weighted_intersection(&incoming),
            _ => WeightedResultSet::new(),
        });
        Ok(self)
    }

    /// Removes the documents matching `query` from the accumulation.
    ///
    /// As with [`and`](Searcher::and), an empty accumulation skips
    /// evaluating the argument. Note the chain caveat on the type: documents
    /// removed here come back through a later `or` that matches them.
    pub fn not(&mut self, query: &Query) -> Result<&mut Self> {
        if !self.is_seeded() {
            debug!("not on an empty accumulation, operand skipped");
            return Ok(self);
        }
        let incoming = query.evaluate(self.catalog)?;
        if !incoming.is_empty() {
            if let Some(current) = self.results.take() {
                self.results = Some(current.difference(&incoming));
            }
        }
        Ok(self)
    }

    /// Hands the accumulation to the catalog for sorting and paging. The
    /// searcher itself never orders anything.
    pub fn finish(&mut self, spec: &SortSpec) -> Vec<DocId> {
        let catalog = self.catalog;
        catalog.sort_result(self.results(), spec)
    }
}
