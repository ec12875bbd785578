//! Covers-test authoring styles and their normalized form.

use std::cmp::Ordering;
use std::sync::Arc;

/// Normalized covers test: `covers(tj, ti)` is true when `tj` may stand in for `ti`.
pub type CoversFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// The covers test as the caller wrote it.
pub enum Comparator<T> {
    /// Total order; `tj` covers `ti` iff `order(tj, ti)` is not `Less`.
    TotalOrder(Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>),
    /// Weak order whose ties are interchangeable; cover iff `order(tj, ti)` is `Equal`.
    WeakOrder(Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>),
    /// Partial order; `None` means incomparable. Cover iff `Equal` or `Greater`.
    PartialOrder(Arc<dyn Fn(&T, &T) -> Option<Ordering> + Send + Sync>),
    /// Arbitrary predicate `(tj, ti) -> bool`.
    Predicate(CoversFn<T>),
}

impl<T> Comparator<T> {
    pub fn style(&self) -> &'static str {
        match self {
            Comparator::TotalOrder(_) => "total order",
            Comparator::WeakOrder(_) => "weak order",
            Comparator::PartialOrder(_) => "partial order",
            Comparator::Predicate(_) => "predicate",
        }
    }
}

impl<T: 'static> Comparator<T> {
    /// Collapse any style into a boolean test, once, before the hot loop.
    pub fn normalize(&self) -> CoversFn<T> {
        match self {
            Comparator::TotalOrder(order) => {
                let order = Arc::clone(order);
                Arc::new(move |tj: &T, ti: &T| order(tj, ti) != Ordering::Less)
            }
            Comparator::WeakOrder(order) => {
                let order = Arc::clone(order);
                Arc::new(move |tj: &T, ti: &T| order(tj, ti) == Ordering::Equal)
            }
            Comparator::PartialOrder(order) => {
                let order = Arc::clone(order);
                Arc::new(move |tj: &T, ti: &T| {
                    matches!(order(tj, ti), Some(Ordering::Equal | Ordering::Greater))
                })
            }
            Comparator::Predicate(pred) => Arc::clone(pred),
        }
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        match self {
            Comparator::TotalOrder(f) => Comparator::TotalOrder(Arc::clone(f)),
            Comparator::WeakOrder(f) => Comparator::WeakOrder(Arc::clone(f)),
            Comparator::PartialOrder(f) => Comparator::PartialOrder(Arc::clone(f)),
            Comparator::Predicate(f) => Comparator::Predicate(Arc::clone(f)),
        }
    }
}

impl<T> std::fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Comparator").field(&self.style()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_covers_greater_or_equal() {
        let covers = Comparator::TotalOrder(Arc::new(|a: &u64, b: &u64| a.cmp(b))).normalize();
        assert!(covers(&5, &3));
        assert!(covers(&3, &3));
        assert!(!covers(&2, &3));
    }

    #[test]
    fn weak_order_covers_only_equivalent_ties() {
        let covers = Comparator::WeakOrder(Arc::new(|a: &u64, b: &u64| (a / 10).cmp(&(b / 10)))).normalize();
        assert!(covers(&12, &17));
        assert!(!covers(&22, &17));
    }

    #[test]
    fn partial_order_rejects_incomparable() {
        // divisibility: a ≥ b iff b divides a
        let covers = Comparator::PartialOrder(Arc::new(|a: &u64, b: &u64| {
            if a == b { Some(Ordering::Equal) }
            else if a % b == 0 { Some(Ordering::Greater) }
            else if b % a == 0 { Some(Ordering::Less) }
            else { None }
        }))
        .normalize();
        assert!(covers(&6, &3));
        assert!(covers(&4, &4));
        assert!(!covers(&3, &6));
        assert!(!covers(&5, &3));
    }

    #[test]
    fn style_names() {
        let pred: Comparator<u64> = Comparator::Predicate(Arc::new(|_, _| true));
        assert_eq!(pred.style(), "predicate");
        assert_eq!(format!("{pred:?}"), "Comparator(\"predicate\")");
    }
}
