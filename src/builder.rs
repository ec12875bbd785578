//! # Role Operator Builder
//!
//! ```text
//! Roles::equivalence()          ← output kind (Equivalence | Ranking | BinaryRelation)
//!     .regular()                ← discipline
//!     .strictness(2)?           ← optional modifiers
//!     .of(n, view)?             ← bind data (Plain or SelfRedirecting view)
//!     .fail_cost(..)            ← optional costs
//!     .comp(..)?                ← at most one covers-test style
//!     .restrict()?              ← role-relative combinations
//!     .make()?                  → RoleOperator
//! ```
//!
//! Configuration errors are returned by the call that causes them; a
//! finished [`RoleOperator`] never fails on well-sized input. The raw
//! distance matrix of any operator is available through
//! [`RoleOperator::distances`], independent of the output kind.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::matching::{MatchRule, MatchingEngine};
use crate::matrix::{DistanceMatrix, LazyDistanceMatrix};
use crate::operator::{self, Combination, MonotoneOperator, Monotonicity};
use crate::policy::{Comparator, CostPolicy};
use crate::roles::{BinaryRelation, Equivalence, Ranking, RoleRelation, RoleStructure, ZeroPattern};
use crate::view::NeighborhoodView;
use crate::{Error, Result};

// ============================================================================
// Discipline
// ============================================================================

/// Matching discipline of a role operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    /// Same-target ties, each partner used once.
    StrongStructural,
    /// Same-target ties, partners pooled.
    WeakStructural,
    /// Dominance: any covering tie, reusable.
    Weak,
    /// Dominance on aggregated costs; exact injective search with a comparator.
    WeaklyEquitable,
    /// Weak, with covers relative to an input role structure.
    Regular,
    /// Injective, with covers relative to an input role structure.
    Equitable,
}

impl Discipline {
    /// Takes a role structure as input.
    pub fn is_role_relative(&self) -> bool {
        matches!(self, Discipline::Regular | Discipline::Equitable)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Discipline::StrongStructural => "strong structural",
            Discipline::WeakStructural => "weak structural",
            Discipline::Weak => "weak",
            Discipline::WeaklyEquitable => "weakly equitable",
            Discipline::Regular => "regular",
            Discipline::Equitable => "equitable",
        }
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Entry point and discipline selection
// ============================================================================

/// Entry point: pick the output kind first.
pub struct Roles;

impl Roles {
    pub fn equivalence() -> DisciplineSelector<Equivalence> {
        Self::of_kind()
    }

    pub fn ranking() -> DisciplineSelector<Ranking> {
        Self::of_kind()
    }

    pub fn relation() -> DisciplineSelector<BinaryRelation> {
        Self::of_kind()
    }

    pub fn of_kind<S: RoleStructure>() -> DisciplineSelector<S> {
        DisciplineSelector { _kind: PhantomData }
    }
}

/// Output kind chosen, discipline pending.
pub struct DisciplineSelector<S> {
    _kind: PhantomData<S>,
}

impl<S: RoleStructure> DisciplineSelector<S> {
    pub fn discipline(self, discipline: Discipline) -> DistanceBuilder<S> {
        DistanceBuilder { discipline, strictness: 1, loose: false, _kind: PhantomData }
    }

    pub fn strong_structural(self) -> DistanceBuilder<S> {
        self.discipline(Discipline::StrongStructural)
    }

    pub fn weak_structural(self) -> DistanceBuilder<S> {
        self.discipline(Discipline::WeakStructural)
    }

    pub fn weak(self) -> DistanceBuilder<S> {
        self.discipline(Discipline::Weak)
    }

    pub fn weakly_equitable(self) -> DistanceBuilder<S> {
        self.discipline(Discipline::WeaklyEquitable)
    }

    pub fn regular(self) -> DistanceBuilder<S> {
        self.discipline(Discipline::Regular)
    }

    pub fn equitable(self) -> DistanceBuilder<S> {
        self.discipline(Discipline::Equitable)
    }
}

/// Discipline chosen, data not yet bound.
#[derive(Debug, Clone)]
pub struct DistanceBuilder<S> {
    discipline: Discipline,
    strictness: u32,
    loose: bool,
    _kind: PhantomData<S>,
}

impl<S: RoleStructure> DistanceBuilder<S> {
    /// Demand units per tie; must be at least 1.
    pub fn strictness(mut self, k: u32) -> Result<Self> {
        if k < 1 {
            return Err(Error::InvalidStrictness(k));
        }
        self.strictness = k;
        Ok(self)
    }

    /// Use the aggregate relaxation and ignore target identity.
    pub fn loose(mut self) -> Self {
        self.loose = true;
        self
    }

    /// Bind to `actor_count` actors read through `view`.
    pub fn of<V: NeighborhoodView>(self, actor_count: usize, view: V) -> Result<BoundBuilder<S, V>> {
        if view.actor_count() != actor_count {
            return Err(Error::ActorCountMismatch { declared: actor_count, view: view.actor_count() });
        }
        Ok(BoundBuilder {
            discipline: self.discipline,
            strictness: self.strictness,
            loose: self.loose,
            actors: actor_count,
            view,
            policy: CostPolicy::default(),
            combination: Combination::None,
        })
    }
}

// ============================================================================
// Bound builder
// ============================================================================

/// Data bound; costs, covers test and combinations pending.
pub struct BoundBuilder<S, V: NeighborhoodView> {
    discipline: Discipline,
    strictness: u32,
    loose: bool,
    actors: usize,
    view: V,
    policy: CostPolicy<V::Tie>,
    combination: Combination<S>,
}

impl<S, V> BoundBuilder<S, V>
where
    S: RoleStructure,
    V: NeighborhoodView,
    V::Tie: 'static,
{
    pub fn fail_cost(mut self, f: impl Fn(&V::Tie) -> u64 + Send + Sync + 'static) -> Self {
        self.policy = std::mem::take(&mut self.policy).with_fail_cost(f);
        self
    }

    /// `f(ti, Some(tj))` prices a match, `f(ti, None)` an unmatched tie.
    pub fn subst_cost(mut self, f: impl Fn(&V::Tie, Option<&V::Tie>) -> u64 + Send + Sync + 'static) -> Self {
        self.policy = std::mem::take(&mut self.policy).with_subst_cost(f);
        self
    }

    /// Total order: `tj` covers `ti` iff `order(tj, ti)` is not `Less`.
    pub fn comp(self, order: impl Fn(&V::Tie, &V::Tie) -> Ordering + Send + Sync + 'static) -> Result<Self> {
        self.comparator(Comparator::TotalOrder(Arc::new(order)))
    }

    /// Weak order: `tj` covers `ti` iff `order(tj, ti)` is `Equal`.
    pub fn comp_weak(self, order: impl Fn(&V::Tie, &V::Tie) -> Ordering + Send + Sync + 'static) -> Result<Self> {
        self.comparator(Comparator::WeakOrder(Arc::new(order)))
    }

    /// Partial order: `None` is incomparable.
    pub fn comp_partial(
        self,
        order: impl Fn(&V::Tie, &V::Tie) -> Option<Ordering> + Send + Sync + 'static,
    ) -> Result<Self> {
        self.comparator(Comparator::PartialOrder(Arc::new(order)))
    }

    /// Arbitrary predicate `(tj, ti) -> covers`.
    pub fn comp_predicate(self, pred: impl Fn(&V::Tie, &V::Tie) -> bool + Send + Sync + 'static) -> Result<Self> {
        self.comparator(Comparator::Predicate(Arc::new(pred)))
    }

    pub fn comparator(mut self, comparator: Comparator<V::Tie>) -> Result<Self> {
        if let Some(existing) = self.policy.comparator() {
            return Err(Error::ConflictingComparator {
                existing: existing.style(),
                requested: comparator.style(),
            });
        }
        self.policy = std::mem::take(&mut self.policy).with_comparator(comparator);
        Ok(self)
    }

    /// Meet every output with `other`.
    pub fn refine_with(self, other: S) -> Result<Self> {
        self.check_size(other.actor_count())?;
        self.combine(Combination::RefineWith(other))
    }

    /// Join every output with `other`.
    pub fn coarsen_with(self, other: S) -> Result<Self> {
        self.check_size(other.actor_count())?;
        self.combine(Combination::CoarsenWith(other))
    }

    /// Meet every output with the operator's input.
    pub fn restrict(self) -> Result<Self> {
        self.combine(Combination::Restrict)
    }

    /// Join every output with the operator's input.
    pub fn extend(self) -> Result<Self> {
        self.combine(Combination::Extend)
    }

    fn check_size(&self, got: usize) -> Result<()> {
        if got != self.actors {
            return Err(Error::SizeMismatch { expected: self.actors, got });
        }
        Ok(())
    }

    fn combine(mut self, combination: Combination<S>) -> Result<Self> {
        if !self.discipline.is_role_relative() {
            return Err(Error::InvalidCombination(format!(
                "{} distances take no role input to combine with",
                self.discipline
            )));
        }
        if !self.combination.is_none() {
            return Err(Error::InvalidCombination("a combination is already configured".into()));
        }
        self.combination = combination;
        Ok(self)
    }

    pub fn make(self) -> Result<RoleOperator<S, V>> {
        let rule = match (self.discipline, self.loose) {
            (_, true) => MatchRule::Aggregate,
            (Discipline::StrongStructural, _) => MatchRule::Injective { by_target: true },
            (Discipline::WeakStructural, _) => MatchRule::Reusable { by_target: true },
            (Discipline::Weak | Discipline::Regular, _) => MatchRule::Reusable { by_target: false },
            (Discipline::WeaklyEquitable, _) if self.policy.has_comparator() => {
                MatchRule::Injective { by_target: false }
            }
            (Discipline::WeaklyEquitable, _) => MatchRule::Aggregate,
            (Discipline::Equitable, _) => MatchRule::Injective { by_target: false },
        };
        tracing::debug!(
            kind = S::KIND,
            discipline = %self.discipline,
            ?rule,
            strictness = self.strictness,
            actors = self.actors,
            context_sensitive = self.view.is_context_sensitive(),
            "role operator configured"
        );
        Ok(RoleOperator {
            discipline: self.discipline,
            rule,
            strictness: self.strictness,
            loose: self.loose,
            actors: self.actors,
            view: self.view,
            policy: self.policy,
            combination: self.combination,
            cache: RwLock::new(None),
        })
    }
}

impl<S, V: NeighborhoodView> std::fmt::Debug for BoundBuilder<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundBuilder")
            .field("discipline", &self.discipline)
            .field("strictness", &self.strictness)
            .field("loose", &self.loose)
            .field("actors", &self.actors)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RoleOperator
// ============================================================================

/// A configured distance, projected into role structures of kind `S`.
pub struct RoleOperator<S, V: NeighborhoodView> {
    discipline: Discipline,
    rule: MatchRule,
    strictness: u32,
    loose: bool,
    actors: usize,
    view: V,
    policy: CostPolicy<V::Tie>,
    combination: Combination<S>,
    /// Distances of an input-independent operator.
    cache: RwLock<Option<Arc<DistanceMatrix>>>,
}

impl<S: RoleStructure, V: NeighborhoodView> RoleOperator<S, V> {
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    pub fn actor_count(&self) -> usize {
        self.actors
    }

    /// Distances do not depend on any role input.
    pub fn is_input_independent(&self) -> bool {
        !self.discipline.is_role_relative() || self.loose
    }

    /// Pair-distance source for this operator and (optional) role input.
    pub fn engine<'a>(&'a self, roles: Option<&'a S>) -> Result<MatchingEngine<'a, V>> {
        let engine = MatchingEngine::new(&self.view, &self.policy, self.rule).with_strictness(self.strictness);
        if self.is_input_independent() {
            return Ok(engine);
        }
        let roles = roles.ok_or(Error::MissingRoleInput(self.discipline))?;
        if roles.actor_count() != self.actors {
            return Err(Error::SizeMismatch { expected: self.actors, got: roles.actor_count() });
        }
        Ok(engine.with_roles(roles as &dyn RoleRelation))
    }

    /// The full distance matrix. Input-independent operators compute it once
    /// and keep it until [`MonotoneOperator::release_cache`].
    pub fn distances(&self, roles: Option<&S>) -> Result<Arc<DistanceMatrix>> {
        let cacheable = self.is_input_independent();
        if cacheable {
            if let Some(matrix) = self.cache.read().as_ref() {
                tracing::debug!(discipline = %self.discipline, "distance matrix served from cache");
                return Ok(Arc::clone(matrix));
            }
        }
        let engine = self.engine(roles)?;
        let matrix = Arc::new(DistanceMatrix::compute(&engine));
        tracing::debug!(
            discipline = %self.discipline,
            rule = ?self.rule,
            strictness = self.strictness,
            cached = cacheable,
            "role distances computed"
        );
        if cacheable {
            *self.cache.write() = Some(Arc::clone(&matrix));
        }
        Ok(matrix)
    }

    /// Distances evaluated on demand and memoized per pair.
    pub fn lazy_distances<'a>(&'a self, roles: Option<&'a S>) -> Result<LazyDistanceMatrix<MatchingEngine<'a, V>>> {
        Ok(LazyDistanceMatrix::new(self.engine(roles)?))
    }

    /// Output of a constant operator.
    pub fn evaluate(&self) -> Result<S> {
        if !self.monotonicity().constant {
            return Err(Error::MissingRoleInput(self.discipline));
        }
        let pattern = ZeroPattern::from_distances(&*self.distances(None)?);
        let output = S::project(&pattern);
        match &self.combination {
            Combination::RefineWith(other) => output.meet(other),
            Combination::CoarsenWith(other) => output.join(other),
            _ => Ok(output),
        }
    }

    /// Iterate from `start` until the output equals the input.
    pub fn fixpoint(&self, start: S, max_rounds: usize) -> Result<S> {
        operator::fixpoint(self, start, max_rounds)
    }
}

impl<S: RoleStructure, V: NeighborhoodView> MonotoneOperator<S> for RoleOperator<S, V> {
    fn apply(&self, input: &S) -> Result<S> {
        if input.actor_count() != self.actors {
            return Err(Error::SizeMismatch { expected: self.actors, got: input.actor_count() });
        }
        let distances = self.distances(Some(input))?;
        let output = S::project(&ZeroPattern::from_distances(&*distances));
        self.combination.combine(output, input)
    }

    fn monotonicity(&self) -> Monotonicity {
        let base = if self.is_input_independent() {
            Monotonicity::CONSTANT
        } else {
            Monotonicity::ISOTONE
        };
        self.combination.adjust(base)
    }

    fn release_cache(&self) {
        let released = self.cache.write().take().is_some();
        tracing::debug!(discipline = %self.discipline, released, "role operator cache released");
    }
}

impl<S, V: NeighborhoodView> std::fmt::Debug for RoleOperator<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleOperator")
            .field("discipline", &self.discipline)
            .field("rule", &self.rule)
            .field("strictness", &self.strictness)
            .field("loose", &self.loose)
            .field("actors", &self.actors)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MemoryNetwork;
    use crate::view::{NeighborhoodExt, Plain};

    fn star() -> MemoryNetwork {
        // 0 → 1, 0 → 2, 0 → 3
        MemoryNetwork::from_ties(4, &[(0, 1), (0, 2), (0, 3)]).unwrap()
    }

    #[test]
    fn zero_strictness_is_rejected_at_configuration() {
        let err = Roles::equivalence().weak().strictness(0).unwrap_err();
        assert!(matches!(err, Error::InvalidStrictness(0)));
    }

    #[test]
    fn actor_count_must_match_view() {
        let net = star();
        let err = Roles::equivalence().weak().of(5, net.outgoing().plain()).unwrap_err();
        assert!(matches!(err, Error::ActorCountMismatch { declared: 5, view: 4 }));
    }

    #[test]
    fn second_comparator_style_is_rejected() {
        let net = star();
        let err = Roles::equivalence()
            .weak()
            .of(4, net.outgoing().plain())
            .unwrap()
            .comp(|a, b| a.weight.cmp(&b.weight))
            .unwrap()
            .comp_predicate(|_, _| true)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ConflictingComparator { existing: "total order", requested: "predicate" }
        ));
    }

    #[test]
    fn combinations_need_a_role_relative_discipline() {
        let net = star();
        let bound = Roles::equivalence().strong_structural().of(4, net.outgoing().plain()).unwrap();
        assert!(matches!(bound.restrict(), Err(Error::InvalidCombination(_))));

        let bound = Roles::equivalence().regular().of(4, net.outgoing().plain()).unwrap();
        assert!(matches!(
            bound.refine_with(Equivalence::trivial(3)),
            Err(Error::SizeMismatch { expected: 4, got: 3 })
        ));

        let bound = Roles::equivalence().regular().of(4, net.outgoing().plain()).unwrap();
        let twice = bound.restrict().unwrap().extend();
        assert!(matches!(twice, Err(Error::InvalidCombination(_))));
    }

    #[test]
    fn discipline_maps_to_rule() {
        let lists: Vec<Vec<usize>> = vec![vec![1], vec![]];
        let rule = |b: DistanceBuilder<Equivalence>| b.of(2, Plain(lists.clone())).unwrap().make().unwrap().rule();

        assert_eq!(rule(Roles::equivalence().strong_structural()), MatchRule::Injective { by_target: true });
        assert_eq!(rule(Roles::equivalence().weak_structural()), MatchRule::Reusable { by_target: true });
        assert_eq!(rule(Roles::equivalence().weak()), MatchRule::Reusable { by_target: false });
        assert_eq!(rule(Roles::equivalence().weakly_equitable()), MatchRule::Aggregate);
        assert_eq!(rule(Roles::equivalence().regular()), MatchRule::Reusable { by_target: false });
        assert_eq!(rule(Roles::equivalence().equitable()), MatchRule::Injective { by_target: false });
        assert_eq!(rule(Roles::equivalence().regular().loose()), MatchRule::Aggregate);

        let exact = Roles::equivalence()
            .weakly_equitable()
            .of(2, Plain(lists.clone()))
            .unwrap()
            .comp(|a, b| a.cmp(b))
            .unwrap()
            .make()
            .unwrap();
        assert_eq!(exact.rule(), MatchRule::Injective { by_target: false });
    }

    #[test]
    fn role_relative_operator_needs_input() {
        let net = star();
        let op = Roles::equivalence().regular().of(4, net.outgoing().plain()).unwrap().make().unwrap();
        assert!(matches!(op.evaluate(), Err(Error::MissingRoleInput(Discipline::Regular))));
        assert!(matches!(op.distances(None), Err(Error::MissingRoleInput(_))));
        assert!(matches!(
            op.apply(&Equivalence::trivial(2)),
            Err(Error::SizeMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn constant_operator_caches_until_released() {
        let net = star();
        let op = Roles::equivalence().weak().of(4, net.outgoing().plain()).unwrap().make().unwrap();
        let first = op.distances(None).unwrap();
        let second = op.distances(None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        op.release_cache();
        let third = op.distances(None).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(first, third);
    }

    #[test]
    fn monotonicity_flags() {
        let net = star();
        let base = Roles::equivalence().weak().of(4, net.outgoing().plain()).unwrap().make().unwrap();
        assert_eq!(base.monotonicity(), Monotonicity::CONSTANT);

        let regular = Roles::equivalence().regular().of(4, net.outgoing().plain()).unwrap().make().unwrap();
        assert_eq!(regular.monotonicity(), Monotonicity::ISOTONE);

        let restricted = Roles::equivalence()
            .regular()
            .of(4, net.outgoing().plain())
            .unwrap()
            .restrict()
            .unwrap()
            .make()
            .unwrap();
        let m = restricted.monotonicity();
        assert!(m.isotone && m.non_increasing && !m.constant && !m.non_decreasing);

        let loose = Roles::equivalence().equitable().loose().of(4, net.outgoing().plain()).unwrap().make().unwrap();
        assert!(loose.monotonicity().constant);
    }

    #[test]
    fn evaluate_projects_base_distances() {
        let net = star();
        let op = Roles::equivalence().weak().of(4, net.outgoing().plain()).unwrap().make().unwrap();
        // 1, 2, 3 have no out-ties and cover each other trivially
        assert_eq!(op.evaluate().unwrap(), Equivalence::from_labels([0, 1, 1, 1]));
        // constant operator ignores its input
        assert_eq!(op.apply(&Equivalence::discrete(4)).unwrap(), op.evaluate().unwrap());
    }

    #[test]
    fn lazy_distances_match_eager() {
        let net = star();
        let op = Roles::ranking().strong_structural().of(4, net.undirected().self_redirecting()).unwrap().make().unwrap();
        let eager = op.distances(None).unwrap();
        let lazy = op.lazy_distances(None).unwrap();
        assert_eq!(lazy.materialize(), *eager);
    }
}
