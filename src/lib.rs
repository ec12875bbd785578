//! # netroles: Role Distances for Social Networks
//!
//! Pairwise role distances between actors, and the role structures
//! (equivalences, rankings, binary relations) obtained from their zero
//! pattern.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Neighborhood` / `NeighborhoodView` are the contract between networks and matching
//! 2. **Tie-agnostic**: ties are opaque; costs and covers tests are caller closures
//! 3. **One engine**: every discipline is a `MatchRule` over the same candidate sets
//! 4. **Errors at configuration**: a finished operator cannot fail on well-sized input
//!
//! ## Quick Start
//!
//! ```rust
//! use netroles::{Equivalence, MemoryNetwork, NeighborhoodExt, Roles};
//!
//! # fn main() -> netroles::Result<()> {
//! // r → a, b;  a → c, d;  b → e
//! let net = MemoryNetwork::from_ties(6, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)])?;
//!
//! let regular = Roles::equivalence()
//!     .regular()
//!     .of(net.actor_count(), net.outgoing().plain())?
//!     .make()?;
//!
//! let roles = regular.fixpoint(Equivalence::trivial(6), 16)?;
//! assert_eq!(roles.members(), vec![vec![0], vec![1, 2], vec![3, 4, 5]]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Disciplines
//!
//! | Discipline | Partners | Reuse | Role input |
//! |------------|----------|-------|------------|
//! | strong structural | same target | once | no |
//! | weak structural | same target | pooled | no |
//! | weak | any covering tie | pooled | no |
//! | weakly equitable | aggregated costs | once | no |
//! | regular | covering tie, related target | pooled | yes |
//! | equitable | covering tie, related target | once | yes |
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | yes | Row-parallel distance matrices via rayon |

// ============================================================================
// Modules
// ============================================================================

pub mod network;
pub mod view;
pub mod policy;
pub mod matching;
pub mod matrix;
pub mod roles;
pub mod operator;
pub mod builder;
pub mod export;

// ============================================================================
// Re-exports: Networks and views
// ============================================================================

pub use network::{Adjacency, Direction, MemoryNetwork, Neighborhood, Tie, TieId};
pub use view::{NeighborhoodExt, NeighborhoodView, PairContext, Plain, SelfRedirecting};

// ============================================================================
// Re-exports: Distances
// ============================================================================

pub use policy::{Comparator, CostPolicy};
pub use matching::{MatchRule, MatchingEngine};
pub use matrix::{DistanceMatrix, Distances, LazyDistanceMatrix, PairDistance};

// ============================================================================
// Re-exports: Role structures and operators
// ============================================================================

pub use roles::{BinaryRelation, Equivalence, Ranking, RoleRelation, RoleStructure, ZeroPattern};
pub use operator::{Combination, MonotoneOperator, Monotonicity};
pub use builder::{BoundBuilder, Discipline, DisciplineSelector, DistanceBuilder, RoleOperator, Roles};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid strictness {0}: must be at least 1")]
    InvalidStrictness(u32),

    #[error("Actor count mismatch: declared {declared}, view has {view}")]
    ActorCountMismatch { declared: usize, view: usize },

    #[error("Conflicting comparator: {existing} already set, cannot add {requested}")]
    ConflictingComparator { existing: &'static str, requested: &'static str },

    #[error("Invalid combination: {0}")]
    InvalidCombination(String),

    #[error("Missing role input: {0} distances need a role structure")]
    MissingRoleInput(Discipline),

    #[error("Size mismatch: expected {expected} actors, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("Actor {actor} out of range for {count} actors")]
    ActorOutOfRange { actor: usize, count: usize },

    #[error("Non-zero diagonal: d({actor}, {actor}) = {distance}")]
    NonZeroDiagonal { actor: usize, distance: u64 },

    #[error("Malformed matrix: {cells} cells for {actors} actors")]
    MalformedMatrix { actors: usize, cells: usize },

    #[error("Relation is not reflexive at actor {actor}")]
    NotReflexive { actor: usize },

    #[error("Relation is not a preorder")]
    NotAPreorder,

    #[error("No fixpoint within {rounds} rounds")]
    NoFixpoint { rounds: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
