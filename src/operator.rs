//! Monotone role operators.
//!
//! A role operator maps a role structure to a role structure of the same
//! kind. Composition code outside this crate only relies on the contract
//! below: apply, report monotonicity, release caches.

use serde::{Deserialize, Serialize};

use crate::roles::RoleStructure;
use crate::{Error, Result};

/// Order-theoretic properties of an operator, with respect to refinement
/// of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Monotonicity {
    /// Finer input never yields coarser output.
    pub isotone: bool,
    /// Output does not depend on the input at all.
    pub constant: bool,
    /// Output always refines the input.
    pub non_increasing: bool,
    /// Output is always at least as coarse as the input.
    pub non_decreasing: bool,
}

impl Monotonicity {
    pub const CONSTANT: Self = Self { isotone: true, constant: true, non_increasing: false, non_decreasing: false };
    pub const ISOTONE: Self = Self { isotone: true, constant: false, non_increasing: false, non_decreasing: false };
}

/// The contract shared by every role operator.
pub trait MonotoneOperator<S> {
    fn apply(&self, input: &S) -> Result<S>;

    fn monotonicity(&self) -> Monotonicity;

    /// Drop memoized results. Later calls recompute identical values.
    fn release_cache(&self);
}

/// How an operator's raw output is combined before it is returned.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Combination<S> {
    #[default]
    None,
    /// Meet with a fixed structure.
    RefineWith(S),
    /// Join with a fixed structure.
    CoarsenWith(S),
    /// Meet with the operator's own input.
    Restrict,
    /// Join with the operator's own input.
    Extend,
}

impl<S: RoleStructure> Combination<S> {
    pub fn combine(&self, output: S, input: &S) -> Result<S> {
        match self {
            Combination::None => Ok(output),
            Combination::RefineWith(other) => output.meet(other),
            Combination::CoarsenWith(other) => output.join(other),
            Combination::Restrict => output.meet(input),
            Combination::Extend => output.join(input),
        }
    }

    /// Properties of `combine ∘ op` given those of `op`.
    pub fn adjust(&self, base: Monotonicity) -> Monotonicity {
        match self {
            Combination::None | Combination::RefineWith(_) | Combination::CoarsenWith(_) => base,
            Combination::Restrict => Monotonicity {
                isotone: base.isotone,
                constant: false,
                non_increasing: true,
                non_decreasing: false,
            },
            Combination::Extend => Monotonicity {
                isotone: base.isotone,
                constant: false,
                non_increasing: false,
                non_decreasing: true,
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Combination::None)
    }
}

/// Apply `op` from `start` until the structure stops changing.
pub fn fixpoint<S, O>(op: &O, start: S, max_rounds: usize) -> Result<S>
where
    S: RoleStructure,
    O: MonotoneOperator<S> + ?Sized,
{
    let mut current = start;
    for round in 1..=max_rounds {
        let next = op.apply(&current)?;
        tracing::trace!(round, kind = S::KIND, related_pairs = next.related_pairs(), "fixpoint round");
        if next == current {
            return Ok(current);
        }
        current = next;
    }
    Err(Error::NoFixpoint { rounds: max_rounds })
}
