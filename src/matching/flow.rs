//! Injective matching as a min-cost flow.
//!
//! ```text
//! source ──k──▶ ti ──1, -(fail - cost)──▶ tj ──1──▶ sink
//! ```
//!
//! Every `Ti` tie supplies `k` demand units, every `Tj` tie absorbs at most
//! one unit overall, and each arc `ti → tj` carries at most one unit, so a
//! tie's units land on distinct partners. Arc costs are negated savings
//! over failing the unit; successive shortest paths augment while a path
//! still saves something, which yields the cheapest flow of any size.
//!
//! Savings beyond `i64::MAX` are clamped and path sums saturate, so huge
//! caller costs give a saturated total instead of wrapping.

use hashbrown::HashMap;

use super::Candidates;

struct FlowArc {
    to: usize,
    cap: i64,
    cost: i64,
}

/// Residual network; arc `e` and its reverse are stored at `e` and `e ^ 1`.
pub(crate) struct FlowNetwork {
    arcs: Vec<FlowArc>,
    adj: Vec<Vec<usize>>,
}

impl FlowNetwork {
    pub fn new(nodes: usize) -> Self {
        Self { arcs: Vec::new(), adj: vec![Vec::new(); nodes] }
    }

    pub fn add_node(&mut self) -> usize {
        self.adj.push(Vec::new());
        self.adj.len() - 1
    }

    pub fn add_arc(&mut self, from: usize, to: usize, cap: i64, cost: i64) {
        self.adj[from].push(self.arcs.len());
        self.arcs.push(FlowArc { to, cap, cost });
        self.adj[to].push(self.arcs.len());
        self.arcs.push(FlowArc { to: from, cap: 0, cost: -cost });
    }

    /// Bellman-Ford with a work queue; returns path cost and arcs from `s` to `t`.
    fn cheapest_path(&self, s: usize, t: usize) -> Option<(i64, Vec<usize>)> {
        let n = self.adj.len();
        let mut dist = vec![i64::MAX; n];
        let mut via: Vec<Option<usize>> = vec![None; n];
        let mut queued = vec![false; n];
        let mut queue = std::collections::VecDeque::new();

        dist[s] = 0;
        queue.push_back(s);
        queued[s] = true;

        while let Some(u) = queue.pop_front() {
            queued[u] = false;
            for &e in &self.adj[u] {
                let arc = &self.arcs[e];
                if arc.cap <= 0 {
                    continue;
                }
                let next = dist[u].saturating_add(arc.cost);
                if next < dist[arc.to] {
                    dist[arc.to] = next;
                    via[arc.to] = Some(e);
                    if !queued[arc.to] {
                        queued[arc.to] = true;
                        queue.push_back(arc.to);
                    }
                }
            }
        }

        if dist[t] == i64::MAX {
            return None;
        }
        let mut path = Vec::new();
        let mut node = t;
        while let Some(e) = via[node] {
            path.push(e);
            node = self.arcs[e ^ 1].to;
        }
        Some((dist[t], path))
    }

    /// Augment along negative-cost paths; returns the total saving.
    pub fn max_savings(&mut self, s: usize, t: usize) -> u64 {
        let mut saved: i64 = 0;
        let mut augmentations = 0usize;
        while let Some((cost, path)) = self.cheapest_path(s, t) {
            if cost >= 0 {
                break;
            }
            let bottleneck = path.iter().map(|&e| self.arcs[e].cap).min().unwrap_or(0);
            for &e in &path {
                self.arcs[e].cap -= bottleneck;
                self.arcs[e ^ 1].cap += bottleneck;
            }
            saved = saved.saturating_sub(cost.saturating_mul(bottleneck));
            augmentations += 1;
        }
        tracing::trace!(augmentations, saved, "injective matching solved");
        u64::try_from(saved).unwrap_or(0)
    }
}

/// Total unit cost of the demand ties `ties` (indices into `fail`/`candidates`).
pub(super) fn total_cost(fail: &[u64], candidates: &Candidates, ties: &[usize], strictness: u64) -> u64 {
    let base = ties.iter().fold(0u64, |acc, &a| acc.saturating_add(fail[a].saturating_mul(strictness)));

    const SOURCE: usize = 0;
    const SINK: usize = 1;
    let mut net = FlowNetwork::new(2);
    let mut partner_nodes: HashMap<usize, usize> = HashMap::new();

    for &a in ties {
        let demand = net.add_node();
        net.add_arc(SOURCE, demand, i64::try_from(strictness).unwrap_or(i64::MAX), 0);
        for &(b, cost) in &candidates[a] {
            let saving = fail[a].saturating_sub(cost);
            if saving == 0 {
                continue;
            }
            let partner = match partner_nodes.get(&b) {
                Some(&node) => node,
                None => {
                    let node = net.add_node();
                    net.add_arc(node, SINK, 1, 0);
                    partner_nodes.insert(b, node);
                    node
                }
            };
            net.add_arc(demand, partner, 1, -i64::try_from(saving).unwrap_or(i64::MAX));
        }
    }

    if partner_nodes.is_empty() {
        return base;
    }
    base.saturating_sub(net.max_savings(SOURCE, SINK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn assignment_prefers_the_larger_total_saving() {
        // t0 can use p0 (saves 3) or p1 (saves 2); t1 only p0 (saves 3).
        // Greedy on t0 would take p0 and leave t1 failing.
        let fail = [3, 3];
        let candidates: Candidates = vec![smallvec![(0, 0), (1, 1)], smallvec![(0, 0)]];
        assert_eq!(total_cost(&fail, &candidates, &[0, 1], 1), 1);
    }

    #[test]
    fn each_partner_serves_one_unit() {
        let fail = [1, 1, 1];
        let candidates: Candidates = vec![smallvec![(0, 0)], smallvec![(0, 0)], smallvec![(0, 0)]];
        assert_eq!(total_cost(&fail, &candidates, &[0, 1, 2], 1), 2);
    }

    #[test]
    fn strictness_needs_distinct_partners_per_tie() {
        let fail = [2];
        let candidates: Candidates = vec![smallvec![(0, 0), (1, 0)]];
        assert_eq!(total_cost(&fail, &candidates, &[0], 2), 0);
        assert_eq!(total_cost(&fail, &candidates, &[0], 3), 2);
    }

    #[test]
    fn no_candidates_means_everything_fails() {
        let fail = [4, 5];
        let candidates: Candidates = vec![smallvec![], smallvec![]];
        assert_eq!(total_cost(&fail, &candidates, &[0, 1], 2), 18);
    }

    #[test]
    fn huge_costs_saturate_instead_of_wrapping() {
        let fail = [u64::MAX, u64::MAX];
        let candidates: Candidates = vec![smallvec![(0, 0)], smallvec![(0, 0)]];
        let total = total_cost(&fail, &candidates, &[0, 1], 2);
        assert!(total >= u64::MAX / 2);
    }

    #[test]
    fn zero_saving_arcs_are_ignored() {
        let fail = [2];
        let candidates: Candidates = vec![smallvec![(0, 2)]];
        assert_eq!(total_cost(&fail, &candidates, &[0], 1), 2);
    }
}
