//! Binary relation: an arbitrary reflexive relation over actors.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use super::pattern::RelationMatrix;
use super::{RoleRelation, RoleStructure, ZeroPattern};

/// Reflexive relation `a R b`, no closure of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RelationWire")]
pub struct BinaryRelation {
    cells: RelationMatrix,
}

#[derive(Deserialize)]
struct RelationWire {
    cells: RelationMatrix,
}

impl TryFrom<RelationWire> for BinaryRelation {
    type Error = Error;

    fn try_from(wire: RelationWire) -> Result<Self> {
        wire.cells.check_reflexive()?;
        Ok(Self { cells: wire.cells })
    }
}

impl BinaryRelation {
    /// Reflexive closure of the given pairs.
    pub fn from_pairs(actor_count: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let mut cells = RelationMatrix::identity(actor_count);
        for (a, b) in pairs {
            let actor = a.max(b);
            if actor >= actor_count {
                return Err(Error::ActorOutOfRange { actor, count: actor_count });
            }
            cells.set(a, b, true);
        }
        Ok(Self { cells })
    }

    pub(crate) fn from_matrix(cells: RelationMatrix) -> Self {
        Self { cells }
    }

    pub(crate) fn matrix(&self) -> &RelationMatrix {
        &self.cells
    }

    pub fn actor_count(&self) -> usize {
        self.cells.size()
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.cells.get(a, b)
    }

    /// Related pairs in row-major order, reflexive pairs included.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.cells.pairs().collect()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.actor_count();
        (0..n).all(|a| (0..n).all(|b| self.contains(a, b) == self.contains(b, a)))
    }

    pub fn is_preorder(&self) -> bool {
        self.cells.is_reflexive() && self.cells.is_transitive()
    }
}

impl RoleRelation for BinaryRelation {
    fn actor_count(&self) -> usize {
        self.cells.size()
    }

    fn related(&self, a: usize, b: usize) -> bool {
        self.contains(a, b)
    }
}

impl RoleStructure for BinaryRelation {
    const KIND: &'static str = "relation";

    fn project(pattern: &ZeroPattern) -> Self {
        Self { cells: pattern.relation().clone() }
    }

    fn universal(actor_count: usize) -> Self {
        Self { cells: RelationMatrix::full(actor_count) }
    }

    fn identity(actor_count: usize) -> Self {
        Self { cells: RelationMatrix::identity(actor_count) }
    }

    fn meet(&self, other: &Self) -> Result<Self> {
        Ok(Self { cells: self.cells.zip_with(&other.cells, |a, b| a && b)? })
    }

    fn join(&self, other: &Self) -> Result<Self> {
        Ok(Self { cells: self.cells.zip_with(&other.cells, |a, b| a || b)? })
    }

    fn related_pairs(&self) -> usize {
        self.cells.pair_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pairs_are_made_reflexive() {
        let r = BinaryRelation::from_pairs(2, [(0, 1)]).unwrap();
        assert_eq!(r.pairs(), vec![(0, 0), (0, 1), (1, 1)]);
        assert!(!r.is_symmetric());
        assert!(r.is_preorder());
    }

    #[test]
    fn join_does_not_close() {
        let a = BinaryRelation::from_pairs(3, [(0, 1)]).unwrap();
        let b = BinaryRelation::from_pairs(3, [(1, 2)]).unwrap();
        let j = a.join(&b).unwrap();
        assert!(j.contains(0, 1) && j.contains(1, 2));
        assert!(!j.contains(0, 2));
        assert!(!j.is_preorder());
    }

    #[test]
    fn out_of_range_pair_is_rejected() {
        assert!(matches!(
            BinaryRelation::from_pairs(2, [(0, 3)]),
            Err(Error::ActorOutOfRange { actor: 3, count: 2 })
        ));
    }

    #[test]
    fn serializes_sparsely() {
        let r = BinaryRelation::from_pairs(2, [(1, 0)]).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"cells": {"actors": 2, "pairs": [[0, 0], [1, 0], [1, 1]]}}));
        let back: BinaryRelation = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn import_rejects_missing_self_pairs() {
        let json = serde_json::json!({"cells": {"actors": 2, "pairs": [[0, 0], [1, 0]]}});
        let err = serde_json::from_value::<BinaryRelation>(json).unwrap_err();
        assert!(err.to_string().contains("not reflexive at actor 1"));
    }
}
