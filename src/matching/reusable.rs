//! Reusable coverage: a `Tj` tie may stand in for any number of `Ti` ties.
//!
//! Each `Ti` tie independently takes its `k` cheapest distinct candidates;
//! missing candidates are charged the tie's fail cost.

use smallvec::SmallVec;

use super::Candidates;

pub(super) fn total_cost(fail: &[u64], candidates: &Candidates, strictness: u64) -> u64 {
    let k = strictness as usize;
    fail.iter()
        .zip(candidates)
        .map(|(&fail, partners)| {
            let mut costs: SmallVec<[u64; 8]> = partners.iter().map(|&(_, c)| c).collect();
            costs.sort_unstable();
            let used = costs.len().min(k);
            let matched = costs[..used].iter().fold(0u64, |acc, &c| acc.saturating_add(c));
            matched.saturating_add(((k - used) as u64).saturating_mul(fail))
        })
        .fold(0u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn one_partner_covers_everything() {
        let fail = [1, 1, 1];
        let candidates: Candidates = vec![smallvec![(0, 0)], smallvec![(0, 0)], smallvec![(0, 0)]];
        assert_eq!(total_cost(&fail, &candidates, 1), 0);
    }

    #[test]
    fn cheapest_partners_are_chosen() {
        let fail = [10];
        let candidates: Candidates = vec![smallvec![(0, 4), (1, 1), (2, 3)]];
        assert_eq!(total_cost(&fail, &candidates, 1), 1);
        assert_eq!(total_cost(&fail, &candidates, 2), 4);
        assert_eq!(total_cost(&fail, &candidates, 4), 18);
    }

    #[test]
    fn uncovered_ties_pay_fail_cost_per_unit() {
        let fail = [2, 5];
        let candidates: Candidates = vec![smallvec![], smallvec![(3, 0)]];
        assert_eq!(total_cost(&fail, &candidates, 1), 2);
        assert_eq!(total_cost(&fail, &candidates, 2), 4 + 5);
    }
}
