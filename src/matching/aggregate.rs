//! Aggregate (weakly equitable) coverage.
//!
//! No partner search: `Ti`'s demand units, sorted by fail cost, are laid
//! against `Tj`'s ties sorted by capacity (their own fail cost), both
//! descending, and paired positionally. A paired unit costs the policy's
//! substitution cost, an unpaired unit its fail cost.
//!
//! ```text
//! Ti = [5, 4, 3]    Tj = [4, 2]
//!       │  │  └─ unpaired ─▶ 3
//!       │  └── 4 vs 2 ─────▶ 2
//!       └───── 5 vs 4 ─────▶ 1        total 6
//! ```
//!
//! Positional pairing alone is not monotone in strictness: extra units of
//! one tie can reach cheaper partners further down `Tj` and pull the
//! average down. The distance at strictness `k` is therefore the largest
//! rounded average over every strictness `1..=k`.

use smallvec::SmallVec;

use crate::policy::CostPolicy;

/// `d(i, j)` at strictness `k`; never below the distance at `k - 1`.
pub(super) fn distance<T>(policy: &CostPolicy<T>, ti: &[T], tj: &[T], fail: &[u64], strictness: u64) -> u64 {
    (1..=strictness.max(1))
        .map(|m| total_cost(policy, ti, tj, fail, m).div_ceil(m))
        .max()
        .unwrap_or(0)
}

/// Positional total of every demand unit at strictness `k`.
pub(super) fn total_cost<T>(policy: &CostPolicy<T>, ti: &[T], tj: &[T], fail: &[u64], strictness: u64) -> u64 {
    let mut demand: SmallVec<[usize; 16]> = (0..ti.len()).collect();
    demand.sort_by(|&a, &b| fail[b].cmp(&fail[a]));

    let capacity: SmallVec<[u64; 16]> = tj.iter().map(|t| policy.fail_cost(t)).collect();
    let mut supply: SmallVec<[usize; 16]> = (0..tj.len()).collect();
    supply.sort_by(|&a, &b| capacity[b].cmp(&capacity[a]));

    let k = strictness as usize;
    let mut partners = supply.iter();
    let mut total = 0u64;

    for &a in &demand {
        for unit in 0..k {
            match partners.next() {
                Some(&b) => {
                    let cost = policy.pair_cost(&ti[a], &tj[b], fail[a]).unwrap_or(fail[a]);
                    total = total.saturating_add(cost);
                }
                None => {
                    total = total.saturating_add(((k - unit) as u64).saturating_mul(fail[a]));
                    break;
                }
            }
        }
    }
    total
}
