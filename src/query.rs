use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog::{Catalog, Index};
use crate::datatype::Scalar;
use crate::error::{DocketError, Result};
use crate::resultset::WeightedResultSet;

// ------------- Query -------------
/// A node in an immutable query expression tree.
///
/// Comparators are always leaves and carry the name of the index that will
/// answer them plus the value(s) to test. Operators always have exactly two
/// children and combine the children's result sets. A tree is built either
/// directly through the constructors and combinators here, or by compiling
/// an expression string (see [`crate::expression::compile`]).
///
/// Trees never change after construction. [`crate::optimize::optimize`]
/// consumes a tree and returns a new one rather than rewriting in place, so
/// a tree in hand is always safe to evaluate concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Eq { index: String, value: Scalar },
    NotEq { index: String, value: Scalar },
    Gt { index: String, value: Scalar },
    Lt { index: String, value: Scalar },
    Ge { index: String, value: Scalar },
    Le { index: String, value: Scalar },
    Contains { index: String, value: Scalar },
    Any { index: String, values: Vec<Scalar> },
    All { index: String, values: Vec<Scalar> },
    Union(Box<Query>, Box<Query>),
    Intersection(Box<Query>, Box<Query>),
    Difference(Box<Query>, Box<Query>),
}

impl Query {
    pub fn eq(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Eq {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn not_eq(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::NotEq {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn gt(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Gt {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn lt(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Lt {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn ge(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Ge {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn le(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Le {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn contains(index: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Query::Contains {
            index: index.into(),
            value: value.into(),
        }
    }
    pub fn any<V: Into<Scalar>>(
        index: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Query::Any {
            index: index.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
    pub fn all<V: Into<Scalar>>(
        index: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Query::All {
            index: index.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Intersection of `self` and `right`, `self` on the left.
    pub fn and(self, right: Query) -> Self {
        Query::Intersection(Box::new(self), Box::new(right))
    }
    /// Union of `self` and `right`, `self` on the left.
    pub fn or(self, right: Query) -> Self {
        Query::Union(Box::new(self), Box::new(right))
    }
    /// Difference of `self` and `right`, `self` on the left.
    pub fn sub(self, right: Query) -> Self {
        Query::Difference(Box::new(self), Box::new(right))
    }

    /// Evaluates the tree against a catalog, producing the weighted set of
    /// matching document ids.
    ///
    /// Comparator leaves look up their index by name (an absent index is a
    /// hard [`DocketError::UnknownIndex`], never an empty result) and return
    /// that index's answer untouched. Operators merge their children's sets.
    /// `Intersection` and `Difference` skip evaluating the right child when
    /// the left child already determines the outcome, so an expensive
    /// operand (a full-text scan, say) placed on the right of an empty one
    /// costs nothing.
    ///
    /// Nothing is cached: re-evaluating the same tree against another
    /// catalog snapshot re-runs every index lookup.
    pub fn evaluate(&self, catalog: &dyn Catalog) -> Result<WeightedResultSet> {
        match self {
            Query::Eq { index, value } => Ok(lookup(catalog, index)?.apply_eq(value)),
            Query::NotEq { index, value } => Ok(lookup(catalog, index)?.apply_not_eq(value)),
            Query::Gt { index, value } => Ok(lookup(catalog, index)?.apply_gt(value)),
            Query::Lt { index, value } => Ok(lookup(catalog, index)?.apply_lt(value)),
            Query::Ge { index, value } => Ok(lookup(catalog, index)?.apply_ge(value)),
            Query::Le { index, value } => Ok(lookup(catalog, index)?.apply_le(value)),
            Query::Contains { index, value } => Ok(lookup(catalog, index)?.apply_contains(value)),
            Query::Any { index, values } => Ok(lookup(catalog, index)?.apply_any(values)),
            Query::All { index, values } => Ok(lookup(catalog, index)?.apply_all(values)),
            Query::Union(left, right) => {
                let left = left.evaluate(catalog)?;
                let right = right.evaluate(catalog)?;
                Ok(left.weighted_union(&right))
            }
            Query::Intersection(left, right) => {
                let left = left.evaluate(catalog)?;
                if left.is_empty() {
                    trace!("intersection short-circuit on empty left operand");
                    return Ok(WeightedResultSet::new());
                }
                let right = right.evaluate(catalog)?;
                if right.is_empty() {
                    return Ok(WeightedResultSet::new());
                }
                Ok(left.weighted_intersection(&right))
            }
            Query::Difference(left, right) => {
                let left = left.evaluate(catalog)?;
                if left.is_empty() {
                    trace!("difference short-circuit on empty left operand");
                    return Ok(left);
                }
                let right = right.evaluate(catalog)?;
                if right.is_empty() {
                    return Ok(left);
                }
                Ok(left.difference(&right))
            }
        }
    }
}

fn lookup<'a>(catalog: &'a dyn Catalog, name: &str) -> Result<&'a dyn Index> {
    catalog
        .lookup_index(name)
        .ok_or_else(|| DocketError::UnknownIndex(name.to_string()))
}

// A malformed operand to one of these is unrepresentable: the operand type
// is Query itself, so the "unsupported operand type" failure mode of a
// dynamically typed rendition is caught at compile time instead.
impl ops::BitAnd for Query {
    type Output = Query;
    fn bitand(self, right: Query) -> Query {
        self.and(right)
    }
}
impl ops::BitOr for Query {
    type Output = Query;
    fn bitor(self, right: Query) -> Query {
        self.or(right)
    }
}
impl ops::Sub for Query {
    type Output = Query;
    fn sub(self, right: Query) -> Query {
        Query::sub(self, right)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Eq { index, value } => write!(f, "{} == {}", index, value),
            Query::NotEq { index, value } => write!(f, "{} != {}", index, value),
            Query::Gt { index, value } => write!(f, "{} > {}", index, value),
            Query::Lt { index, value } => write!(f, "{} < {}", index, value),
            Query::Ge { index, value } => write!(f, "{} >= {}", index, value),
            Query::Le { index, value } => write!(f, "{} <= {}", index, value),
            Query::Contains { index, value } => write!(f, "{} in {}", value, index),
            Query::Any { index, values } => write!(f, "{} any {}", index, Values(values)),
            Query::All { index, values } => write!(f, "{} all {}", index, Values(values)),
            Query::Union(left, right) => write!(f, "({} | {})", left, right),
            Query::Intersection(left, right) => write!(f, "({} & {})", left, right),
            Query::Difference(left, right) => write!(f, "({} - {})", left, right),
        }
    }
}

struct Values<'a>(&'a [Scalar]);
impl fmt::Display for Values<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
