//! Distance matrices.
//!
//! [`DistanceMatrix`] is the materialized n×n table, filled row by row from
//! any [`PairDistance`] source. With the `parallel` feature each rayon worker
//! owns one row slice; pairs share nothing, so no other synchronization is
//! needed. [`LazyDistanceMatrix`] evaluates cells on first access and
//! memoizes them until [`LazyDistanceMatrix::release_cache`].
//!
//! The diagonal is zero and never handed to the source.

use std::ops::Index;

use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A source of off-diagonal distances.
pub trait PairDistance: Sync {
    fn actor_count(&self) -> usize;

    /// `d(i, j)` for `i != j`.
    fn pair_distance(&self, i: usize, j: usize) -> u64;
}

/// Anything that answers `d(i, j)` for all pairs, diagonal included.
pub trait Distances {
    fn actor_count(&self) -> usize;

    fn distance(&self, i: usize, j: usize) -> u64;
}

// ============================================================================
// DistanceMatrix
// ============================================================================

/// Materialized n×n distance table, row-major. Not necessarily symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixWire")]
pub struct DistanceMatrix {
    actors: usize,
    cells: Vec<u64>,
}

/// Unchecked wire form; imports go through the same checks as `from_rows`.
#[derive(Deserialize)]
struct MatrixWire {
    actors: usize,
    cells: Vec<u64>,
}

impl TryFrom<MatrixWire> for DistanceMatrix {
    type Error = Error;

    fn try_from(wire: MatrixWire) -> Result<Self> {
        let MatrixWire { actors, cells } = wire;
        if actors.checked_mul(actors) != Some(cells.len()) {
            return Err(Error::MalformedMatrix { actors, cells: cells.len() });
        }
        if let Some(actor) = (0..actors).find(|&i| cells[i * actors + i] != 0) {
            return Err(Error::NonZeroDiagonal { actor, distance: cells[actor * actors + actor] });
        }
        Ok(Self { actors, cells })
    }
}

impl DistanceMatrix {
    /// Evaluate every ordered pair of `source`.
    pub fn compute<D: PairDistance + ?Sized>(source: &D) -> Self {
        let n = source.actor_count();
        let mut cells = vec![0u64; n * n];
        if n > 1 {
            fill_rows(source, n, &mut cells);
        }
        tracing::debug!(actors = n, "distance matrix materialized");
        Self { actors: n, cells }
    }

    /// Build from explicit rows. Rows must form a square with a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self> {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::SizeMismatch { expected: n, got: row.len() });
            }
            if row[i] != 0 {
                return Err(Error::NonZeroDiagonal { actor: i, distance: row[i] });
            }
            cells.extend(row);
        }
        Ok(Self { actors: n, cells })
    }

    pub fn actor_count(&self) -> usize {
        self.actors
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.cells[i * self.actors + j]
    }

    pub fn row(&self, i: usize) -> &[u64] {
        &self.cells[i * self.actors..(i + 1) * self.actors]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        // chunks(0) panics, and an empty matrix has no rows anyway
        self.cells.chunks(self.actors.max(1))
    }

    pub fn max(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.actors;
        (0..n).all(|i| (i + 1..n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[cfg(feature = "parallel")]
fn fill_rows<D: PairDistance + ?Sized>(source: &D, n: usize, cells: &mut [u64]) {
    use rayon::prelude::*;

    cells.par_chunks_mut(n).enumerate().for_each(|(i, row)| fill_row(source, i, row));
}

#[cfg(not(feature = "parallel"))]
fn fill_rows<D: PairDistance + ?Sized>(source: &D, n: usize, cells: &mut [u64]) {
    cells.chunks_mut(n).enumerate().for_each(|(i, row)| fill_row(source, i, row));
}

fn fill_row<D: PairDistance + ?Sized>(source: &D, i: usize, row: &mut [u64]) {
    for (j, cell) in row.iter_mut().enumerate() {
        if i != j {
            *cell = source.pair_distance(i, j);
        }
    }
}

impl Distances for DistanceMatrix {
    fn actor_count(&self) -> usize {
        self.actors
    }

    fn distance(&self, i: usize, j: usize) -> u64 {
        self.get(i, j)
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = u64;

    fn index(&self, (i, j): (usize, usize)) -> &u64 {
        &self.cells[i * self.actors + j]
    }
}

// ============================================================================
// LazyDistanceMatrix
// ============================================================================

/// Distances evaluated on demand and memoized per ordered pair.
///
/// Concurrent readers of the same missing cell may both compute it; the
/// results are identical, so the second insert is harmless.
/// `release_cache` must not race with reads it would invalidate.
pub struct LazyDistanceMatrix<D> {
    source: D,
    cache: RwLock<HashMap<(usize, usize), u64>>,
}

impl<D: PairDistance> LazyDistanceMatrix<D> {
    pub fn new(source: D) -> Self {
        Self { source, cache: RwLock::new(HashMap::new()) }
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        if i == j {
            return 0;
        }
        if let Some(d) = self.cache.read().get(&(i, j)) {
            return *d;
        }
        let d = self.source.pair_distance(i, j);
        self.cache.write().insert((i, j), d);
        d
    }

    /// Number of memoized off-diagonal cells.
    pub fn cached_pairs(&self) -> usize {
        self.cache.read().len()
    }

    /// Drop every memoized cell. Later reads recompute identical values.
    pub fn release_cache(&self) {
        let mut cache = self.cache.write();
        tracing::debug!(released = cache.len(), "lazy distance cache released");
        cache.clear();
    }

    /// Evaluate every remaining cell into a dense matrix.
    pub fn materialize(&self) -> DistanceMatrix {
        let n = self.source.actor_count();
        let mut cells = vec![0u64; n * n];
        for i in 0..n {
            for j in 0..n {
                cells[i * n + j] = self.get(i, j);
            }
        }
        DistanceMatrix { actors: n, cells }
    }

    pub fn source(&self) -> &D {
        &self.source
    }
}

impl<D: PairDistance> Distances for LazyDistanceMatrix<D> {
    fn actor_count(&self) -> usize {
        self.source.actor_count()
    }

    fn distance(&self, i: usize, j: usize) -> u64 {
        self.get(i, j)
    }
}

impl<D> std::fmt::Debug for LazyDistanceMatrix<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyDistanceMatrix")
            .field("cached_pairs", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}
