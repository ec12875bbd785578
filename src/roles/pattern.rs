//! Dense boolean relations and the zero pattern of a distance matrix.
//!
//! Every role structure is a thin encoding of one [`ZeroPattern`]: the set
//! of ordered pairs whose distance is zero. The pattern is read once from
//! the matrix; the encoders never look at distances again.

use serde::{Deserialize, Serialize};

use crate::matrix::Distances;
use crate::Error;

// ============================================================================
// RelationMatrix
// ============================================================================

/// Row-major n×n boolean matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PairList", try_from = "PairList")]
pub(crate) struct RelationMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl RelationMatrix {
    pub fn empty(n: usize) -> Self {
        Self { n, cells: vec![false; n * n] }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::empty(n);
        for a in 0..n {
            m.set(a, a, true);
        }
        m
    }

    pub fn full(n: usize) -> Self {
        Self { n, cells: vec![true; n * n] }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, a: usize, b: usize) -> bool {
        self.cells[a * self.n + b]
    }

    #[inline]
    pub fn set(&mut self, a: usize, b: usize, value: bool) {
        self.cells[a * self.n + b] = value;
    }

    pub fn pair_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.n;
        self.cells.iter().enumerate().filter(|(_, c)| **c).map(move |(k, _)| (k / n, k % n))
    }

    /// Cell-wise combination; both sides must have the same size.
    pub fn zip_with(&self, other: &Self, f: impl Fn(bool, bool) -> bool) -> crate::Result<Self> {
        if self.n != other.n {
            return Err(Error::SizeMismatch { expected: self.n, got: other.n });
        }
        let cells = self.cells.iter().zip(&other.cells).map(|(a, b)| f(*a, *b)).collect();
        Ok(Self { n: self.n, cells })
    }

    pub fn is_reflexive(&self) -> bool {
        (0..self.n).all(|a| self.get(a, a))
    }

    /// Error on the first actor not related to itself.
    pub fn check_reflexive(&self) -> crate::Result<()> {
        match (0..self.n).find(|&a| !self.get(a, a)) {
            Some(actor) => Err(Error::NotReflexive { actor }),
            None => Ok(()),
        }
    }

    pub fn is_transitive(&self) -> bool {
        let n = self.n;
        (0..n).all(|a| {
            (0..n).filter(|&b| self.get(a, b)).all(|b| (0..n).all(|c| !self.get(b, c) || self.get(a, c)))
        })
    }

    /// Warshall closure in place.
    pub fn close_transitively(&mut self) {
        let n = self.n;
        for k in 0..n {
            for a in 0..n {
                if !self.get(a, k) {
                    continue;
                }
                for b in 0..n {
                    if self.get(k, b) {
                        self.set(a, b, true);
                    }
                }
            }
        }
    }
}

/// Sparse wire form of a relation matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PairList {
    actors: usize,
    pairs: Vec<(usize, usize)>,
}

impl From<RelationMatrix> for PairList {
    fn from(m: RelationMatrix) -> Self {
        Self { actors: m.n, pairs: m.pairs().collect() }
    }
}

impl TryFrom<PairList> for RelationMatrix {
    type Error = Error;

    fn try_from(list: PairList) -> crate::Result<Self> {
        let mut m = Self::empty(list.actors);
        for (a, b) in list.pairs {
            let actor = a.max(b);
            if actor >= list.actors {
                return Err(Error::ActorOutOfRange { actor, count: list.actors });
            }
            m.set(a, b, true);
        }
        Ok(m)
    }
}

// ============================================================================
// ZeroPattern
// ============================================================================

/// The ordered pairs `(i, j)` with `d(i, j) = 0`. Always reflexive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroPattern {
    zero: RelationMatrix,
}

impl ZeroPattern {
    /// Read every off-diagonal cell of `distances` exactly once.
    pub fn from_distances<D: Distances + ?Sized>(distances: &D) -> Self {
        let n = distances.actor_count();
        let mut zero = RelationMatrix::identity(n);
        for i in 0..n {
            for j in 0..n {
                if i != j && distances.distance(i, j) == 0 {
                    zero.set(i, j, true);
                }
            }
        }
        Self { zero }
    }

    pub fn actor_count(&self) -> usize {
        self.zero.size()
    }

    pub fn is_zero(&self, i: usize, j: usize) -> bool {
        self.zero.get(i, j)
    }

    /// `d(i, j) = d(j, i) = 0`.
    pub fn is_mutual(&self, i: usize, j: usize) -> bool {
        self.zero.get(i, j) && self.zero.get(j, i)
    }

    pub(crate) fn relation(&self) -> &RelationMatrix {
        &self.zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;

    #[test]
    fn zero_pattern_reads_off_diagonal_zeros() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0, 0, 2],
            vec![1, 0, 0],
            vec![0, 0, 0],
        ])
        .unwrap();
        let z = ZeroPattern::from_distances(&m);
        assert!(z.is_zero(0, 1));
        assert!(!z.is_zero(1, 0));
        assert!(z.is_mutual(1, 2));
        assert!(!z.is_mutual(0, 2));
        assert!(z.relation().is_reflexive());
    }

    #[test]
    fn closure_makes_relation_transitive() {
        let mut m = RelationMatrix::identity(3);
        m.set(0, 1, true);
        m.set(1, 2, true);
        assert!(!m.is_transitive());
        m.close_transitively();
        assert!(m.is_transitive());
        assert!(m.get(0, 2));
        assert!(!m.get(2, 0));
    }

    #[test]
    fn zip_rejects_size_mismatch() {
        let a = RelationMatrix::identity(2);
        let b = RelationMatrix::identity(3);
        assert!(matches!(a.zip_with(&b, |x, y| x && y), Err(Error::SizeMismatch { expected: 2, got: 3 })));
    }

    #[test]
    fn reflexivity_check_names_the_actor() {
        let mut m = RelationMatrix::identity(3);
        assert!(m.check_reflexive().is_ok());
        m.set(1, 1, false);
        assert!(matches!(m.check_reflexive(), Err(Error::NotReflexive { actor: 1 })));
    }

    #[test]
    fn pair_list_rejects_out_of_range_pairs() {
        let list = PairList { actors: 2, pairs: vec![(0, 5)] };
        assert!(RelationMatrix::try_from(list).is_err());
    }
}
