//! # Role Structures
//!
//! The three output kinds a distance matrix projects into:
//!
//! | Kind | Type | `related(a, b)` | Projection from `d` |
//! |------|------|-----------------|---------------------|
//! | Equivalence | [`Equivalence`] | same class | union-find over `d(a,b) = d(b,a) = 0` |
//! | Ranking | [`Ranking`] | `a ≤ b` | `d(a,b) = 0` (b covers a) |
//! | Binary relation | [`BinaryRelation`] | `a R b` | `d(a,b) = 0` |
//!
//! All three share one intermediate, the [`ZeroPattern`]; the encoders are
//! independent and only read it. Every kind also forms a lattice under
//! refinement (`meet` = finer, `join` = coarser), which is what the
//! refine/coarsen/restrict/extend combinations of role operators use.

mod disjoint_sets;
pub mod equivalence;
pub mod pattern;
pub mod ranking;
pub mod relation;

pub use equivalence::Equivalence;
pub use pattern::ZeroPattern;
pub use ranking::Ranking;
pub use relation::BinaryRelation;

pub(crate) use disjoint_sets::DisjointSets;

use crate::Result;

/// Read access to "is `a` related to `b`" over actors `0..actor_count()`.
///
/// Object safe: the matching engine takes the caller's role structure as
/// `&dyn RoleRelation` when deciding whether two tie targets play compatible roles.
pub trait RoleRelation: Sync {
    fn actor_count(&self) -> usize;

    fn related(&self, a: usize, b: usize) -> bool;
}

/// A role structure that distance matrices project into.
pub trait RoleStructure: RoleRelation + Clone + PartialEq + std::fmt::Debug + Send + 'static {
    /// Human-readable kind name, used in logs and exports.
    const KIND: &'static str;

    /// Encode a zero pattern as this kind.
    fn project(pattern: &ZeroPattern) -> Self;

    /// Coarsest structure: every actor related to every actor.
    fn universal(actor_count: usize) -> Self;

    /// Finest structure: every actor related only to itself.
    fn identity(actor_count: usize) -> Self;

    /// Greatest lower bound (refinement by `other`).
    fn meet(&self, other: &Self) -> Result<Self>;

    /// Least upper bound (coarsening by `other`).
    fn join(&self, other: &Self) -> Result<Self>;

    /// Number of ordered related pairs, reflexive ones included.
    fn related_pairs(&self) -> usize {
        let n = self.actor_count();
        (0..n).map(|a| (0..n).filter(|&b| self.related(a, b)).count()).sum()
    }

    /// `self` is at least as fine as `other`.
    fn refines(&self, other: &Self) -> bool {
        let n = self.actor_count();
        n == other.actor_count()
            && (0..n).all(|a| (0..n).all(|b| !self.related(a, b) || other.related(a, b)))
    }
}
