//! # Network Contract
//!
//! The distance engine never owns a network. It reads ties through the
//! [`Neighborhood`] trait, which is the contract between any network
//! representation and the matching engine.
//!
//! ## Implementations
//!
//! | Type | Module | Description |
//! |------|--------|-------------|
//! | `Adjacency<'_>` | `memory` | Directional view of a [`MemoryNetwork`] |
//! | `Vec<Vec<usize>>` | here | Plain adjacency lists, each tie is its target |
//!
//! Design rule: a neighborhood is context-free. Comparison-pair aware
//! resolution lives in [`crate::view`].

pub mod memory;

use serde::{Deserialize, Serialize};

pub use memory::{Adjacency, MemoryNetwork};

// ============================================================================
// Tie identifiers and direction
// ============================================================================

/// Opaque tie identifier, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TieId(pub u64);

impl std::fmt::Display for TieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which incident ties of an actor make up its neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

// ============================================================================
// Tie
// ============================================================================

/// A weighted, directed tie between two actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tie {
    pub id: TieId,
    pub source: usize,
    pub target: usize,
    pub weight: u64,
}

impl Tie {
    pub fn new(id: TieId, source: usize, target: usize) -> Self {
        Self { id, source, target, weight: 1 }
    }

    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = weight;
        self
    }

    /// The "other" end of the tie from the given actor.
    pub fn other_end(&self, from: usize) -> Option<usize> {
        if from == self.source { Some(self.target) }
        else if from == self.target { Some(self.source) }
        else { None }
    }

    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

// ============================================================================
// Neighborhood trait
// ============================================================================

/// Per-actor enumeration of incident ties with target resolution.
///
/// Ties are read-only while distances are computed, and the engine may read
/// them from several threads at once.
pub trait Neighborhood: Sync {
    /// The tie type handed to cost functions and comparators.
    type Tie: Sync;

    /// Number of actors; valid actor indices are `0..actor_count()`.
    fn actor_count(&self) -> usize;

    /// Ordered ties of `actor`.
    fn ties(&self, actor: usize) -> &[Self::Tie];

    /// The actor a tie of `actor` points to.
    fn target(&self, actor: usize, tie: &Self::Tie) -> usize;

    fn degree(&self, actor: usize) -> usize {
        self.ties(actor).len()
    }
}

impl<N: Neighborhood + ?Sized> Neighborhood for &N {
    type Tie = N::Tie;

    fn actor_count(&self) -> usize {
        (**self).actor_count()
    }

    fn ties(&self, actor: usize) -> &[Self::Tie] {
        (**self).ties(actor)
    }

    fn target(&self, actor: usize, tie: &Self::Tie) -> usize {
        (**self).target(actor, tie)
    }
}

/// Adjacency lists where every tie is just the index of its target.
impl Neighborhood for Vec<Vec<usize>> {
    type Tie = usize;

    fn actor_count(&self) -> usize {
        self.len()
    }

    fn ties(&self, actor: usize) -> &[usize] {
        &self[actor]
    }

    fn target(&self, _actor: usize, tie: &usize) -> usize {
        *tie
    }
}
