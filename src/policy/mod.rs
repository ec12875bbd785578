//! # Cost Policy
//!
//! What a match costs and which ties may be matched at all:
//!
//! | Component | Signature | Default |
//! |-----------|-----------|---------|
//! | fail cost | `Fn(&T) -> u64` | `subst(t, None)` if a substitution cost is set, else 1 |
//! | substitution cost | `Fn(&T, Option<&T>) -> u64` | 0 for a covering pair |
//! | covers test | [`Comparator`] | every tie covers every tie |
//!
//! All three are optional and independent. A policy is built once per
//! operator and shared read-only by every pair computation.

pub mod comparator;

use std::sync::Arc;

pub use comparator::{Comparator, CoversFn};

pub type FailFn<T> = Arc<dyn Fn(&T) -> u64 + Send + Sync>;
pub type SubstFn<T> = Arc<dyn Fn(&T, Option<&T>) -> u64 + Send + Sync>;

/// Fail cost, substitution cost and covers test for one tie type.
pub struct CostPolicy<T> {
    fail: Option<FailFn<T>>,
    subst: Option<SubstFn<T>>,
    comparator: Option<Comparator<T>>,
    covers: Option<CoversFn<T>>,
}

impl<T> Default for CostPolicy<T> {
    fn default() -> Self {
        Self { fail: None, subst: None, comparator: None, covers: None }
    }
}

impl<T> Clone for CostPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            fail: self.fail.clone(),
            subst: self.subst.clone(),
            comparator: self.comparator.clone(),
            covers: self.covers.clone(),
        }
    }
}

impl<T> std::fmt::Debug for CostPolicy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostPolicy")
            .field("fail_cost", &self.fail.is_some())
            .field("subst_cost", &self.subst.is_some())
            .field("comparator", &self.comparator)
            .finish()
    }
}

impl<T: 'static> CostPolicy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fail_cost(mut self, f: impl Fn(&T) -> u64 + Send + Sync + 'static) -> Self {
        self.fail = Some(Arc::new(f));
        self
    }

    pub fn with_subst_cost(mut self, f: impl Fn(&T, Option<&T>) -> u64 + Send + Sync + 'static) -> Self {
        self.subst = Some(Arc::new(f));
        self
    }

    /// Install the covers test. Replaces any previous one; callers that must
    /// reject a second style check [`CostPolicy::comparator`] first.
    pub fn with_comparator(mut self, comparator: Comparator<T>) -> Self {
        self.covers = Some(comparator.normalize());
        self.comparator = Some(comparator);
        self
    }
}

impl<T> CostPolicy<T> {
    pub fn comparator(&self) -> Option<&Comparator<T>> {
        self.comparator.as_ref()
    }

    pub fn has_comparator(&self) -> bool {
        self.covers.is_some()
    }

    /// Penalty for leaving `tie` unmatched.
    pub fn fail_cost(&self, tie: &T) -> u64 {
        match (&self.fail, &self.subst) {
            (Some(fail), _) => fail(tie),
            (None, Some(subst)) => subst(tie, None),
            (None, None) => 1,
        }
    }

    /// Cost of letting `tj` stand in for `ti`, assuming `tj` covers `ti`.
    pub fn subst_cost(&self, ti: &T, tj: &T) -> u64 {
        self.subst.as_ref().map_or(0, |subst| subst(ti, Some(tj)))
    }

    /// Cost of `ti` with no partner; identical to its fail cost.
    pub fn absent_cost(&self, ti: &T) -> u64 {
        self.fail_cost(ti)
    }

    pub fn covers(&self, tj: &T, ti: &T) -> bool {
        self.covers.as_ref().is_none_or(|covers| covers(tj, ti))
    }

    /// Cost of matching `ti` to `tj`, or `None` when `tj` does not cover `ti`.
    /// Never exceeds `fail`, the fail cost of `ti`.
    pub fn pair_cost(&self, ti: &T, tj: &T, fail: u64) -> Option<u64> {
        self.covers(tj, ti).then(|| self.subst_cost(ti, tj).min(fail))
    }
}
