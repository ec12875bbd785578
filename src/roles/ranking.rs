//! Ranking: a preorder `a ≤ b` over actors.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use super::pattern::RelationMatrix;
use super::{BinaryRelation, DisjointSets, Equivalence, RoleRelation, RoleStructure, ZeroPattern};

/// Reflexive relation `a ≤ b` ("b outranks a").
///
/// Rankings built by validated constructors are transitive. A ranking
/// projected from a distance matrix is transitive only when the distance
/// satisfies a triangle-type inequality (the structural disciplines do);
/// callers of looser disciplines can check [`Ranking::is_transitive`].
/// Imports are checked for reflexivity only, so projected rankings
/// round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RankingWire")]
pub struct Ranking {
    order: RelationMatrix,
}

#[derive(Deserialize)]
struct RankingWire {
    order: RelationMatrix,
}

impl TryFrom<RankingWire> for Ranking {
    type Error = Error;

    fn try_from(wire: RankingWire) -> Result<Self> {
        wire.order.check_reflexive()?;
        Ok(Self { order: wire.order })
    }
}

impl Ranking {
    /// Validate that `relation` is a preorder.
    pub fn from_relation(relation: &BinaryRelation) -> Result<Self> {
        if !relation.is_preorder() {
            return Err(Error::NotAPreorder);
        }
        Ok(Self { order: relation.matrix().clone() })
    }

    /// `a ≤ b` iff `a` and `b` share a class.
    pub fn from_equivalence(eq: &Equivalence) -> Self {
        let n = eq.actor_count();
        let mut order = RelationMatrix::empty(n);
        for a in 0..n {
            for b in 0..n {
                order.set(a, b, eq.related(a, b));
            }
        }
        Self { order }
    }

    pub fn actor_count(&self) -> usize {
        self.order.size()
    }

    pub fn leq(&self, a: usize, b: usize) -> bool {
        self.order.get(a, b)
    }

    /// `a ≤ b` and `b ≤ a`.
    pub fn equivalent(&self, a: usize, b: usize) -> bool {
        self.leq(a, b) && self.leq(b, a)
    }

    pub fn is_transitive(&self) -> bool {
        self.order.is_transitive()
    }

    /// Symmetric kernel as a partition. For a non-transitive ranking the
    /// classes are the transitive closure of mutual comparability.
    pub fn kernel(&self) -> Equivalence {
        let n = self.actor_count();
        let mut sets = DisjointSets::new(n);
        for a in 0..n {
            for b in (a + 1)..n {
                if self.equivalent(a, b) {
                    sets.union(a, b);
                }
            }
        }
        Equivalence::from_labels(sets.roots())
    }

    pub fn to_relation(&self) -> BinaryRelation {
        BinaryRelation::from_matrix(self.order.clone())
    }

    /// Actors `b` with `actor ≤ b`, `actor` itself included.
    pub fn upper_set(&self, actor: usize) -> Vec<usize> {
        (0..self.actor_count()).filter(|&b| self.leq(actor, b)).collect()
    }
}

impl RoleRelation for Ranking {
    fn actor_count(&self) -> usize {
        self.order.size()
    }

    fn related(&self, a: usize, b: usize) -> bool {
        self.leq(a, b)
    }
}

impl RoleStructure for Ranking {
    const KIND: &'static str = "ranking";

    fn project(pattern: &ZeroPattern) -> Self {
        Self { order: pattern.relation().clone() }
    }

    fn universal(actor_count: usize) -> Self {
        Self { order: RelationMatrix::full(actor_count) }
    }

    fn identity(actor_count: usize) -> Self {
        Self { order: RelationMatrix::identity(actor_count) }
    }

    fn meet(&self, other: &Self) -> Result<Self> {
        Ok(Self { order: self.order.zip_with(&other.order, |a, b| a && b)? })
    }

    fn join(&self, other: &Self) -> Result<Self> {
        let mut order = self.order.zip_with(&other.order, |a, b| a || b)?;
        order.close_transitively();
        Ok(Self { order })
    }

    fn related_pairs(&self) -> usize {
        self.order.pair_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain() -> Ranking {
        // 0 ≤ 1 ≤ 2
        let rel = BinaryRelation::from_pairs(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
        Ranking::from_relation(&rel).unwrap()
    }

    #[test]
    fn non_transitive_relation_is_rejected() {
        let rel = BinaryRelation::from_pairs(3, [(0, 1), (1, 2)]).unwrap();
        assert!(matches!(Ranking::from_relation(&rel), Err(Error::NotAPreorder)));
    }

    #[test]
    fn kernel_of_equivalence_ranking_round_trips() {
        let eq = Equivalence::from_labels([0, 1, 0, 1, 2]);
        assert_eq!(eq.to_ranking().kernel(), eq);
    }

    #[test]
    fn kernel_of_chain_is_discrete() {
        let r = chain();
        assert_eq!(r.kernel(), Equivalence::discrete(3));
        assert_eq!(r.upper_set(1), vec![1, 2]);
    }

    #[test]
    fn join_closes_transitively() {
        let a = Ranking::from_relation(&BinaryRelation::from_pairs(3, [(0, 1)]).unwrap()).unwrap();
        let b = Ranking::from_relation(&BinaryRelation::from_pairs(3, [(1, 2)]).unwrap()).unwrap();
        let j = a.join(&b).unwrap();
        assert!(j.leq(0, 2));
        assert!(j.is_transitive());
        assert_eq!(a.meet(&b).unwrap(), Ranking::identity(3));
    }

    #[test]
    fn import_requires_reflexivity() {
        let missing = serde_json::from_str::<Ranking>(r#"{"order":{"actors":2,"pairs":[[0,1]]}}"#);
        assert!(missing.is_err());

        let r: Ranking = serde_json::from_str(r#"{"order":{"actors":2,"pairs":[[0,0],[0,1],[1,1]]}}"#).unwrap();
        assert!(r.leq(0, 0) && r.leq(0, 1) && !r.leq(1, 0));
    }

    #[test]
    fn universal_and_identity_bound_everything() {
        let r = chain();
        assert!(Ranking::identity(3).refines(&r));
        assert!(r.refines(&Ranking::universal(3)));
        assert_eq!(r.related_pairs(), 6);
    }
}
