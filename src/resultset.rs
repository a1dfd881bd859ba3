use crate::datatype::{DocId, Weight};

use serde::{Deserialize, Serialize};

// ------------- WeightedResultSet -------------
/// An ordered, duplicate-free set of document identifiers, each carrying a
/// numeric weight. Semantically a sparse vector over document-id space.
///
/// Entries are kept ascending by document id, which makes every merge a
/// two-pointer walk that is linear in the combined size of the operands.
///
/// The weight-combination rule for documents present in both operands of a
/// union or intersection defaults to addition. Indexes that need a different
/// policy (relevance-scoring text indexes, for instance) can use the `_by`
/// variants and supply their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedResultSet {
    entries: Vec<(DocId, Weight)>,
}

impl WeightedResultSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a document. Inserting an id that is already present
    /// accumulates the weight rather than replacing it.
    pub fn insert(&mut self, doc: DocId, weight: Weight) {
        match self.entries.binary_search_by_key(&doc, |&(d, _)| d) {
            Ok(at) => self.entries[at].1 += weight,
            Err(at) => self.entries.insert(at, (doc, weight)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, doc: DocId) -> bool {
        self.entries
            .binary_search_by_key(&doc, |&(d, _)| d)
            .is_ok()
    }

    pub fn weight(&self, doc: DocId) -> Option<Weight> {
        self.entries
            .binary_search_by_key(&doc, |&(d, _)| d)
            .ok()
            .map(|at| self.entries[at].1)
    }

    /// Iterates `(doc id, weight)` pairs ascending by document id.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, Weight)> + '_ {
        self.entries.iter().copied()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.entries.iter().map(|&(d, _)| d)
    }

    /// Union of both operands. A document present in only one operand keeps
    /// that operand's weight; a document present in both gets `combine(l, r)`.
    pub fn weighted_union_by(
        &self,
        other: &Self,
        combine: impl Fn(Weight, Weight) -> Weight,
    ) -> Self {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let mut left = self.entries.iter().peekable();
        let mut right = other.entries.iter().peekable();
        loop {
            match (left.peek(), right.peek()) {
                (Some(&&(ld, lw)), Some(&&(rd, rw))) => {
                    if ld < rd {
                        merged.push((ld, lw));
                        left.next();
                    } else if rd < ld {
                        merged.push((rd, rw));
                        right.next();
                    } else {
                        merged.push((ld, combine(lw, rw)));
                        left.next();
                        right.next();
                    }
                }
                (Some(&&entry), None) => {
                    merged.push(entry);
                    left.next();
                }
                (None, Some(&&entry)) => {
                    merged.push(entry);
                    right.next();
                }
                (None, None) => break,
            }
        }
        Self { entries: merged }
    }

    pub fn weighted_union(&self, other: &Self) -> Self {
        self.weighted_union_by(other, |l, r| l + r)
    }

    /// Documents present in both operands, weights combined by `combine`.
    pub fn weighted_intersection_by(
        &self,
        other: &Self,
        combine: impl Fn(Weight, Weight) -> Weight,
    ) -> Self {
        let mut merged = Vec::with_capacity(self.len().min(other.len()));
        let mut right = other.entries.iter().peekable();
        for &(ld, lw) in &self.entries {
            while right.next_if(|&&(rd, _)| rd < ld).is_some() {}
            match right.peek() {
                Some(&&(rd, rw)) if rd == ld => merged.push((ld, combine(lw, rw))),
                Some(_) => (),
                None => break,
            }
        }
        Self { entries: merged }
    }

    pub fn weighted_intersection(&self, other: &Self) -> Self {
        self.weighted_intersection_by(other, |l, r| l + r)
    }

    /// Documents of the left operand whose id does not appear in the right
    /// operand. Weights are taken from the left operand unchanged.
    pub fn difference(&self, other: &Self) -> Self {
        let mut merged = Vec::with_capacity(self.len());
        let mut right = other.entries.iter().peekable();
        for &(ld, lw) in &self.entries {
            while right.next_if(|&&(rd, _)| rd < ld).is_some() {}
            match right.peek() {
                Some(&&(rd, _)) if rd == ld => (),
                _ => merged.push((ld, lw)),
            }
        }
        Self { entries: merged }
    }
}

impl FromIterator<(DocId, Weight)> for WeightedResultSet {
    fn from_iter<I: IntoIterator<Item = (DocId, Weight)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (doc, weight) in iter {
            set.insert(doc, weight);
        }
        set
    }
}

// Most indexes emit weight 1 per match, so building straight from ids is the
// common case.
impl FromIterator<DocId> for WeightedResultSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        iter.into_iter().map(|doc| (doc, 1.0)).collect()
    }
}

impl Extend<(DocId, Weight)> for WeightedResultSet {
    fn extend<I: IntoIterator<Item = (DocId, Weight)>>(&mut self, iter: I) {
        for (doc, weight) in iter {
            self.insert(doc, weight);
        }
    }
}
