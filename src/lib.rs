//! Docket – the query algebra and expression compiler for a catalog/index
//! search engine.
//!
//! A query is an immutable tree of [`query::Query`] nodes: comparator leaves
//! (`index == value`, ordering tests, containment, batched membership) and
//! set operators (union, intersection, difference) over exactly two
//! children. Evaluating a tree against a [`catalog::Catalog`] produces a
//! [`resultset::WeightedResultSet`], an ordered set of document ids with
//! weights, merged pairwise in linear time.
//!
//! ## Modules
//! * [`query`] – The algebra itself: node constructors, combinators,
//!   operator overloads and evaluation with empty-operand short-circuits.
//! * [`expression`] – Compiles an expression string such as
//!   `"author == 'borges' and year >= 1944"` into the same trees, resolving
//!   free names through a caller-supplied table.
//! * [`optimize`] – A rewrite pass that batches runs of equality tests on
//!   one index into a single `Any`/`All` membership test.
//! * [`search`] – [`search::Searcher`], a chainable and/or/not refinement
//!   of a running result set, order-dependent by design.
//! * [`catalog`] – The collaborator traits: a catalog maps index names to
//!   indexes and sorts final results; an index answers one comparator kind
//!   per method.
//! * [`resultset`] – The weighted ordered-set primitive and its merges.
//! * [`datatype`] – Scalar values, document ids and weights.
//! * [`error`] – The crate-wide error enum and `Result` alias.
//!
//! ## Quick Start
//! ```
//! use std::collections::HashMap;
//! use docket::{expression::compile, optimize::optimize, query::Query};
//!
//! let names = HashMap::new();
//! let tree = compile("color == 'red' and color == 'blue'", &names).unwrap();
//! // two equality tests on one index collapse into a batched membership test
//! assert_eq!(
//!     optimize(tree),
//!     Query::all("color", ["red", "blue"]),
//! );
//! ```
//!
//! Indexes, their document-matching logic and the storage behind them are
//! external collaborators: this crate only combines the sets they return.
//! Evaluation and compilation are pure and reentrant; a [`search::Searcher`]
//! is single-request mutable state.

pub mod catalog;
pub mod datatype;
pub mod error;
pub mod expression;
pub mod optimize;
pub mod query;
pub mod resultset;
pub mod search;
