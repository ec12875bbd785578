//! Neighborhood views: tie lists as seen while comparing two actors.
//!
//! A view answers "which ties does `actor` have, and where do they point"
//! for a given ordered comparison pair `(p, q)`. Two readings exist:
//!
//! - [`Plain`] ignores the pair. Dominance and role-relative disciplines
//!   are target-agnostic or compare targets through a role structure, so
//!   they never need more.
//! - [`SelfRedirecting`] reads the ties of the compared partner `q` through
//!   the transposition of `p` and `q`. A tie `q → p` becomes `q → q` and a
//!   loop `q → q` becomes `q → p`. When judging whether `p` and `q` occupy
//!   the same position, the tie between them is then matched as the
//!   corresponding tie of the other, instead of failing because an actor
//!   cannot be tied to itself.

use crate::network::Neighborhood;

/// The ordered pair of actors under comparison: `p` is the demand side,
/// `q` the covering side of `d(p, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairContext {
    pub p: usize,
    pub q: usize,
}

impl PairContext {
    pub fn new(p: usize, q: usize) -> Self {
        Self { p, q }
    }

    /// The other actor of the pair, if `actor` belongs to it.
    pub fn partner_of(&self, actor: usize) -> Option<usize> {
        if actor == self.p { Some(self.q) }
        else if actor == self.q { Some(self.p) }
        else { None }
    }
}

/// Tie enumeration for a comparison pair.
pub trait NeighborhoodView: Sync {
    type Tie: Sync;

    fn actor_count(&self) -> usize;

    fn ties(&self, ctx: PairContext, actor: usize) -> &[Self::Tie];

    fn count(&self, ctx: PairContext, actor: usize) -> usize {
        self.ties(ctx, actor).len()
    }

    /// Resolved target of `tie`, one of `actor`'s ties.
    fn target(&self, ctx: PairContext, actor: usize, tie: &Self::Tie) -> usize;

    fn is_context_sensitive(&self) -> bool {
        false
    }
}

// ============================================================================
// Plain
// ============================================================================

/// Context-free view: targets are whatever the neighborhood says.
#[derive(Debug, Clone, Copy)]
pub struct Plain<N>(pub N);

impl<N: Neighborhood> NeighborhoodView for Plain<N> {
    type Tie = N::Tie;

    fn actor_count(&self) -> usize {
        self.0.actor_count()
    }

    fn ties(&self, _ctx: PairContext, actor: usize) -> &[N::Tie] {
        self.0.ties(actor)
    }

    fn target(&self, _ctx: PairContext, actor: usize, tie: &N::Tie) -> usize {
        self.0.target(actor, tie)
    }
}

// ============================================================================
// SelfRedirecting
// ============================================================================

/// Context-sensitive view that swaps the compared pair in the partner's ties.
#[derive(Debug, Clone, Copy)]
pub struct SelfRedirecting<N>(pub N);

impl<N: Neighborhood> NeighborhoodView for SelfRedirecting<N> {
    type Tie = N::Tie;

    fn actor_count(&self) -> usize {
        self.0.actor_count()
    }

    fn ties(&self, _ctx: PairContext, actor: usize) -> &[N::Tie] {
        self.0.ties(actor)
    }

    fn target(&self, ctx: PairContext, actor: usize, tie: &N::Tie) -> usize {
        let target = self.0.target(actor, tie);
        if actor != ctx.q || ctx.p == ctx.q {
            return target;
        }
        if target == ctx.p {
            actor
        } else if target == actor {
            ctx.p
        } else {
            target
        }
    }

    fn is_context_sensitive(&self) -> bool {
        true
    }
}

/// Shorthands for wrapping a neighborhood into a view.
pub trait NeighborhoodExt: Neighborhood + Sized {
    fn plain(self) -> Plain<Self> {
        Plain(self)
    }

    fn self_redirecting(self) -> SelfRedirecting<Self> {
        SelfRedirecting(self)
    }
}

impl<N: Neighborhood> NeighborhoodExt for N {}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved<V: NeighborhoodView<Tie = usize>>(view: &V, ctx: PairContext, actor: usize) -> Vec<usize> {
        view.ties(ctx, actor).iter().map(|t| view.target(ctx, actor, t)).collect()
    }

    #[test]
    fn plain_view_ignores_the_pair() {
        let lists = vec![vec![1, 2], vec![0], vec![]];
        let view = lists.plain();
        let ctx = PairContext::new(0, 1);
        assert_eq!(resolved(&view, ctx, 0), vec![1, 2]);
        assert_eq!(resolved(&view, ctx, 1), vec![0]);
        assert!(!view.is_context_sensitive());
    }

    #[test]
    fn partner_ties_are_read_through_the_transposition() {
        // 1 points at 0, itself and 2
        let lists = vec![vec![1], vec![0, 1, 2], vec![]];
        let view = lists.self_redirecting();
        let ctx = PairContext::new(0, 1);

        assert_eq!(resolved(&view, ctx, 1), vec![1, 0, 2]);
        // demand side untouched
        assert_eq!(resolved(&view, ctx, 0), vec![1]);
        // actors outside the pair untouched
        assert_eq!(resolved(&view, ctx, 2), Vec::<usize>::new());
        assert_eq!(view.count(ctx, 1), 3);
    }

    #[test]
    fn diagonal_context_never_redirects() {
        let lists = vec![vec![0, 1], vec![]];
        let view = lists.self_redirecting();
        assert_eq!(resolved(&view, PairContext::new(0, 0), 0), vec![0, 1]);
    }

    #[test]
    fn partner_of_pair_members() {
        let ctx = PairContext::new(3, 7);
        assert_eq!(ctx.partner_of(3), Some(7));
        assert_eq!(ctx.partner_of(7), Some(3));
        assert_eq!(ctx.partner_of(1), None);
    }
}
