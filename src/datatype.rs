// used to print out readable forms of a scalar
use std::fmt;

use serde::{Deserialize, Serialize};

// ------------- DocId -------------
// Document identifiers are fixed at 64 bits for the whole crate. Indexes,
// result sets and the searcher all agree on this width.
pub type DocId = u64;

// ------------- Weight -------------
pub type Weight = f64;

// ------------- Scalar -------------
/// A comparison value as it appears in a query: the right-hand side of
/// `index == value`, an element of an `any`/`all` batch, or a full-text term.
///
/// Scalars are opaque to the algebra itself. They are handed unchanged to the
/// index that answers the comparator, so what a given scalar *matches* is
/// entirely the index's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "'{}'", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}
impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}
impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}
impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}
