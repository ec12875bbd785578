//! Equivalence: a partition of the actors into role classes.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use super::{DisjointSets, Ranking, RoleRelation, RoleStructure, ZeroPattern};

/// Partition of actors `0..n`, stored as one class id per actor.
///
/// Class ids are canonical: classes are numbered in order of their smallest
/// member, so two equal partitions compare equal regardless of how they
/// were labeled when built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct Equivalence {
    classes: Vec<usize>,
}

impl Equivalence {
    /// Build from arbitrary labels; only equality of labels matters.
    pub fn from_labels<L: Eq + std::hash::Hash>(labels: impl IntoIterator<Item = L>) -> Self {
        let mut ids: HashMap<L, usize> = HashMap::new();
        let classes = labels
            .into_iter()
            .map(|label| {
                let next = ids.len();
                *ids.entry(label).or_insert(next)
            })
            .collect();
        Self { classes }
    }

    /// One class holding every actor.
    pub fn trivial(actor_count: usize) -> Self {
        Self { classes: vec![0; actor_count] }
    }

    /// Every actor in its own class.
    pub fn discrete(actor_count: usize) -> Self {
        Self { classes: (0..actor_count).collect() }
    }

    pub fn actor_count(&self) -> usize {
        self.classes.len()
    }

    pub fn class_of(&self, actor: usize) -> usize {
        self.classes[actor]
    }

    pub fn class_count(&self) -> usize {
        self.classes.iter().max().map_or(0, |max| max + 1)
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Members of each class, classes in id order, members ascending.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.class_count()];
        for (actor, &class) in self.classes.iter().enumerate() {
            members[class].push(actor);
        }
        members
    }

    /// The ranking in which `a ≤ b` iff `a` and `b` share a class.
    pub fn to_ranking(&self) -> Ranking {
        Ranking::from_equivalence(self)
    }

    fn from_sets(mut sets: DisjointSets) -> Self {
        Self::from_labels(sets.roots())
    }
}

impl From<Vec<usize>> for Equivalence {
    fn from(labels: Vec<usize>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<Equivalence> for Vec<usize> {
    fn from(eq: Equivalence) -> Self {
        eq.classes
    }
}

impl RoleRelation for Equivalence {
    fn actor_count(&self) -> usize {
        self.classes.len()
    }

    fn related(&self, a: usize, b: usize) -> bool {
        self.classes[a] == self.classes[b]
    }
}

impl RoleStructure for Equivalence {
    const KIND: &'static str = "equivalence";

    fn project(pattern: &ZeroPattern) -> Self {
        let n = pattern.actor_count();
        let mut sets = DisjointSets::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if pattern.is_mutual(i, j) {
                    sets.union(i, j);
                }
            }
        }
        Self::from_sets(sets)
    }

    fn universal(actor_count: usize) -> Self {
        Self::trivial(actor_count)
    }

    fn identity(actor_count: usize) -> Self {
        Self::discrete(actor_count)
    }

    fn meet(&self, other: &Self) -> Result<Self> {
        if self.actor_count() != other.actor_count() {
            return Err(Error::SizeMismatch { expected: self.actor_count(), got: other.actor_count() });
        }
        Ok(Self::from_labels(self.classes.iter().zip(&other.classes)))
    }

    fn join(&self, other: &Self) -> Result<Self> {
        if self.actor_count() != other.actor_count() {
            return Err(Error::SizeMismatch { expected: self.actor_count(), got: other.actor_count() });
        }
        let n = self.actor_count();
        let mut sets = DisjointSets::new(n);
        for partition in [self, other] {
            let mut first: HashMap<usize, usize> = HashMap::new();
            for actor in 0..n {
                let rep = *first.entry(partition.classes[actor]).or_insert(actor);
                sets.union(rep, actor);
            }
        }
        Ok(Self::from_sets(sets))
    }

    fn related_pairs(&self) -> usize {
        self.members().iter().map(|m| m.len() * m.len()).sum()
    }
}
