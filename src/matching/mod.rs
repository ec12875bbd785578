//! # Matching Engine
//!
//! Turns two tie lists and a [`CostPolicy`] into one integer distance.
//!
//! ## Rules
//!
//! | Rule | Partners of a `Ti` tie | Partner reuse | Solver |
//! |------|------------------------|---------------|--------|
//! | `Injective { by_target: true }` | same resolved target | once | min-cost flow per target group |
//! | `Reusable { by_target: true }` | same resolved target | unlimited | cheapest-k per tie |
//! | `Reusable { by_target: false }` | any covering tie | unlimited | cheapest-k per tie |
//! | `Injective { by_target: false }` | any covering tie | once | min-cost flow |
//! | `Aggregate` | positional, after sorting | once | sorted subtraction |
//!
//! ## Strictness
//!
//! Every `Ti` tie carries `k` demand units and each unit needs its own
//! partner. A served unit costs `min(subst, fail)`, an unserved one `fail`.
//! The distance is the total divided by `k`, rounded up, so `k = 1` is the
//! plain discipline and larger `k` never lowers a distance. The aggregate
//! rule keeps the largest such distance over `1..=k`, since its positional
//! pairing shifts as units are added.
//!
//! Totals saturate at `u64::MAX`; costs are expected to stay far below it.
//!
//! ## Role-relative covers
//!
//! With a role structure attached, `tj` covers `ti` only if
//! `target(ti)` is related to `target(tj)` *and* the policy's covers test
//! holds. The aggregate rule ignores targets and therefore roles.

pub(crate) mod flow;
mod aggregate;
mod reusable;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::matrix::PairDistance;
use crate::policy::CostPolicy;
use crate::roles::RoleRelation;
use crate::view::{NeighborhoodView, PairContext};

/// Per `Ti` tie: `(index into Tj, unit cost)` of every admissible partner.
pub(crate) type Candidates = Vec<SmallVec<[(usize, u64); 4]>>;

/// How `Ti` ties find partners in `Tj`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchRule {
    /// Each `Tj` tie serves at most one demand unit.
    Injective { by_target: bool },
    /// A `Tj` tie may serve any number of `Ti` ties.
    Reusable { by_target: bool },
    /// Sorted positional pairing of aggregated costs.
    Aggregate,
}

impl MatchRule {
    pub fn is_target_sensitive(&self) -> bool {
        matches!(self, MatchRule::Injective { by_target: true } | MatchRule::Reusable { by_target: true })
    }
}

// ============================================================================
// MatchingEngine
// ============================================================================

/// One configured distance: view × policy × rule × strictness (× roles).
pub struct MatchingEngine<'a, V: NeighborhoodView> {
    view: &'a V,
    policy: &'a CostPolicy<V::Tie>,
    rule: MatchRule,
    strictness: u64,
    roles: Option<&'a dyn RoleRelation>,
}

impl<'a, V: NeighborhoodView> MatchingEngine<'a, V> {
    pub fn new(view: &'a V, policy: &'a CostPolicy<V::Tie>, rule: MatchRule) -> Self {
        Self { view, policy, rule, strictness: 1, roles: None }
    }

    /// `k` demand units per tie; `0` is treated as `1`.
    pub fn with_strictness(mut self, k: u32) -> Self {
        self.strictness = u64::from(k.max(1));
        self
    }

    /// Restrict covers to ties whose targets are related under `roles`.
    pub fn with_roles(mut self, roles: &'a dyn RoleRelation) -> Self {
        self.roles = Some(roles);
        self
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    pub fn strictness(&self) -> u64 {
        self.strictness
    }

    /// `d(i, j)`; zero on the diagonal.
    pub fn distance(&self, i: usize, j: usize) -> u64 {
        if i == j {
            return 0;
        }
        let ctx = PairContext::new(i, j);
        let ti = self.view.ties(ctx, i);
        if ti.is_empty() {
            return 0;
        }
        let tj = self.view.ties(ctx, j);
        let k = self.strictness;
        let fail: SmallVec<[u64; 16]> = ti.iter().map(|t| self.policy.fail_cost(t)).collect();

        let total = match self.rule {
            MatchRule::Aggregate => return aggregate::distance(self.policy, ti, tj, &fail, k),
            MatchRule::Reusable { by_target } => {
                let candidates = self.candidates(ctx, ti, tj, &fail, by_target);
                reusable::total_cost(&fail, &candidates, k)
            }
            MatchRule::Injective { by_target: false } => {
                let candidates = self.candidates(ctx, ti, tj, &fail, false);
                let all: SmallVec<[usize; 16]> = (0..ti.len()).collect();
                flow::total_cost(&fail, &candidates, &all, k)
            }
            MatchRule::Injective { by_target: true } => {
                let candidates = self.candidates(ctx, ti, tj, &fail, true);
                target_groups(self.view, ctx, ti)
                    .values()
                    .map(|group| flow::total_cost(&fail, &candidates, group, k))
                    .fold(0u64, u64::saturating_add)
            }
        };
        total.div_ceil(k)
    }

    /// Admissible partners of every `Ti` tie. Each covers test runs at most once per pair.
    fn candidates(
        &self,
        ctx: PairContext,
        ti: &[V::Tie],
        tj: &[V::Tie],
        fail: &[u64],
        by_target: bool,
    ) -> Candidates {
        let (i, j) = (ctx.p, ctx.q);
        let targets_j: SmallVec<[usize; 16]> = tj.iter().map(|t| self.view.target(ctx, j, t)).collect();

        let mut same_target: HashMap<usize, SmallVec<[usize; 4]>> = HashMap::new();
        if by_target {
            for (b, &target) in targets_j.iter().enumerate() {
                same_target.entry(target).or_default().push(b);
            }
        }

        let mut candidates: Candidates = Vec::with_capacity(ti.len());
        for (a, tie) in ti.iter().enumerate() {
            let target_i = self.view.target(ctx, i, tie);
            let mut partners = SmallVec::new();
            let mut consider = |b: usize| {
                let role_ok = self.roles.is_none_or(|roles| roles.related(target_i, targets_j[b]));
                if !role_ok {
                    return;
                }
                if let Some(cost) = self.policy.pair_cost(tie, &tj[b], fail[a]) {
                    partners.push((b, cost));
                }
            };
            if by_target {
                for &b in same_target.get(&target_i).into_iter().flatten() {
                    consider(b);
                }
            } else {
                (0..tj.len()).for_each(&mut consider);
            }
            candidates.push(partners);
        }
        candidates
    }
}

/// `Ti` tie indices grouped by resolved target.
fn target_groups<V: NeighborhoodView>(view: &V, ctx: PairContext, ti: &[V::Tie]) -> HashMap<usize, SmallVec<[usize; 4]>> {
    let mut groups: HashMap<usize, SmallVec<[usize; 4]>> = HashMap::new();
    for (a, tie) in ti.iter().enumerate() {
        groups.entry(view.target(ctx, ctx.p, tie)).or_default().push(a);
    }
    groups
}

impl<V: NeighborhoodView> PairDistance for MatchingEngine<'_, V> {
    fn actor_count(&self) -> usize {
        self.view.actor_count()
    }

    fn pair_distance(&self, i: usize, j: usize) -> u64 {
        self.distance(i, j)
    }
}

impl<V: NeighborhoodView> std::fmt::Debug for MatchingEngine<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("rule", &self.rule)
            .field("strictness", &self.strictness)
            .field("role_relative", &self.roles.is_some())
            .finish_non_exhaustive()
    }
}
