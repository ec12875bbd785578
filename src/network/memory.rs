//! In-memory network.
//!
//! This is the reference implementation of `Neighborhood`.
//! Actors are dense indices `0..n`; ties are stored once and mirrored into
//! per-direction adjacency lists so every view hands out a plain slice.
//!
//! ## Limitations
//!
//! - **Append-only**: ties cannot be removed. Build a new network instead.
//! - **No parallel-edge merging**: adding the same pair twice yields a
//!   multigraph, which the structural disciplines treat as two ties.

use crate::{Error, Result};
use super::{Direction, Neighborhood, Tie, TieId};

// ============================================================================
// MemoryNetwork
// ============================================================================

/// In-memory weighted directed network.
#[derive(Debug, Clone, Default)]
pub struct MemoryNetwork {
    ties: Vec<Tie>,
    /// actor → ties with `source == actor`
    outgoing: Vec<Vec<Tie>>,
    /// actor → ties with `target == actor`
    incoming: Vec<Vec<Tie>>,
    /// actor → all incident ties, loops listed once
    both: Vec<Vec<Tie>>,
}

impl MemoryNetwork {
    pub fn new(actor_count: usize) -> Self {
        Self {
            ties: Vec::new(),
            outgoing: vec![Vec::new(); actor_count],
            incoming: vec![Vec::new(); actor_count],
            both: vec![Vec::new(); actor_count],
        }
    }

    /// Build a network of unit-weight ties from `(source, target)` pairs.
    pub fn from_ties(actor_count: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut network = Self::new(actor_count);
        for &(src, dst) in pairs {
            network.add_tie(src, dst)?;
        }
        Ok(network)
    }

    pub fn actor_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn tie_count(&self) -> usize {
        self.ties.len()
    }

    pub fn ties(&self) -> &[Tie] {
        &self.ties
    }

    /// Add a unit-weight tie.
    pub fn add_tie(&mut self, src: usize, dst: usize) -> Result<TieId> {
        self.add_weighted_tie(src, dst, 1)
    }

    pub fn add_weighted_tie(&mut self, src: usize, dst: usize, weight: u64) -> Result<TieId> {
        let count = self.actor_count();
        for actor in [src, dst] {
            if actor >= count {
                return Err(Error::ActorOutOfRange { actor, count });
            }
        }

        let id = TieId(self.ties.len() as u64);
        let tie = Tie::new(id, src, dst).with_weight(weight);
        self.ties.push(tie);

        self.outgoing[src].push(tie);
        self.incoming[dst].push(tie);
        self.both[src].push(tie);
        if src != dst {
            self.both[dst].push(tie);
        }

        Ok(id)
    }

    /// Add a tie in each direction between `a` and `b`.
    pub fn add_reciprocal(&mut self, a: usize, b: usize, weight: u64) -> Result<(TieId, TieId)> {
        let forward = self.add_weighted_tie(a, b, weight)?;
        let backward = self.add_weighted_tie(b, a, weight)?;
        Ok((forward, backward))
    }

    /// Directional neighborhood of every actor.
    pub fn neighborhood(&self, dir: Direction) -> Adjacency<'_> {
        let lists = match dir {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
            Direction::Both => &self.both,
        };
        Adjacency { lists, dir }
    }

    pub fn outgoing(&self) -> Adjacency<'_> {
        self.neighborhood(Direction::Outgoing)
    }

    pub fn incoming(&self) -> Adjacency<'_> {
        self.neighborhood(Direction::Incoming)
    }

    /// Undirected reading: every tie is incident to both endpoints.
    pub fn undirected(&self) -> Adjacency<'_> {
        self.neighborhood(Direction::Both)
    }
}

// ============================================================================
// Adjacency view
// ============================================================================

/// A borrowed, direction-fixed neighborhood of a [`MemoryNetwork`].
#[derive(Debug, Clone, Copy)]
pub struct Adjacency<'n> {
    lists: &'n [Vec<Tie>],
    dir: Direction,
}

impl Adjacency<'_> {
    pub fn direction(&self) -> Direction {
        self.dir
    }
}

impl Neighborhood for Adjacency<'_> {
    type Tie = Tie;

    fn actor_count(&self) -> usize {
        self.lists.len()
    }

    fn ties(&self, actor: usize) -> &[Tie] {
        &self.lists[actor]
    }

    fn target(&self, actor: usize, tie: &Tie) -> usize {
        match self.dir {
            Direction::Outgoing => tie.target,
            Direction::Incoming => tie.source,
            Direction::Both => tie.other_end(actor).unwrap_or(tie.target),
        }
    }
}
