//! Best-first k-extraction over the implicit heap-of-heaps.
//!
//! A frontier candidate points at one node of some vertex's sidetrack heap and
//! carries the total cost of the walk that ends with that sidetrack. Popping
//! a candidate fans out three ways:
//!
//! * descend into the heap of the sidetrack's landing vertex (extends the walk
//!   by one more deviation),
//! * replace the node by its left child, or
//! * by its right child (same position, different deviation).
//!
//! Costs at interior heap nodes are relative: a child replaces its parent, so
//! the child's candidate cost is `cost + child.extra - node.extra`.

use crate::error::{InvalidInput, Result};
use crate::forest::SidetrackForest;
use crate::graph::{Cost, INF};
use crate::leftist::{NodeId, Sidetrack};
use crate::queue::{HeapStats, MinHeap};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How equal-cost walks are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Every walk gets its own rank, ties included.
    AllowTies,
    /// One rank per distinct cost; walks tying the previous rank are dropped.
    DistinctOnly,
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ties" | "allow_ties" | "allow-ties" => Ok(Mode::AllowTies),
            "distinct" | "distinct_only" | "distinct-only" => Ok(Mode::DistinctOnly),
            other => Err(format!("unknown mode '{other}', expected 'ties' or 'distinct'")),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractStats {
    pub frontier: HeapStats,
    pub ties_dropped: u64, // DistinctOnly pops that matched the last rank
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked {
    /// Ranked walk costs, non-decreasing, first one is the shortest distance.
    pub costs: Vec<Cost>,
    /// Per rank, the sidetracks taken in walk order (only when recorded).
    pub sidetracks: Option<Vec<Vec<Sidetrack>>>,
    /// Fewer than `k` ranks exist.
    pub insufficient: bool,
    pub stats: ExtractStats,
}

impl Ranked {
    #[inline] pub fn len(&self) -> usize { self.costs.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.costs.is_empty() }

    /// Cost of the last rank obtained.
    pub fn kth_cost(&self) -> Option<Cost> { self.costs.last().copied() }

    /// Costs as signed values, padded with `sentinel` up to `k` entries. The
    /// core never pads on its own; this is for callers that print fixed-width
    /// tables.
    pub fn padded(&self, k: usize, sentinel: i64) -> Vec<i64> {
        let mut out: Vec<i64> = self.costs.iter().take(k).map(|&c| i64::try_from(c).unwrap_or(i64::MAX)).collect();
        out.resize(k, sentinel);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    cost: Cost,
    order: u64, // push counter, equal costs pop first-in first-out
    node: NodeId,
    seq: Option<u32>,
}

/// Persistent cons list of sidetrack nodes; appending never copies.
#[derive(Default)]
struct SeqArena { links: Vec<(NodeId, Option<u32>)> }

impl SeqArena {
    fn push(&mut self, node: NodeId, prev: Option<u32>) -> Option<u32> {
        self.links.push((node, prev));
        Some((self.links.len() - 1) as u32)
    }

    fn materialize(&self, mut seq: Option<u32>, forest: &SidetrackForest) -> Vec<Sidetrack> {
        let mut out = Vec::new();
        while let Some(i) = seq {
            let (node, prev) = self.links[i as usize];
            out.push(forest.node(node).sidetrack);
            seq = prev;
        }
        out.reverse();
        out
    }
}

struct Frontier { heap: MinHeap<Candidate>, order: u64 }

impl Frontier {
    #[inline]
    fn push(&mut self, cost: Cost, node: NodeId, seq: Option<u32>) {
        self.heap.push(Candidate { cost, order: self.order, node, seq });
        self.order += 1;
    }
}

/// Emits up to `k` ranked walk costs from `source` to the forest's
/// destination. `Ok(None)` means the destination is unreachable.
pub fn extract(dist: &[Cost], forest: &SidetrackForest, source: u32, k: usize, mode: Mode, record: bool) -> Result<Option<Ranked>> {
    if k == 0 { return Err(InvalidInput::ZeroK.into()); }
    let n = dist.len() as u32;
    if source >= n { return Err(InvalidInput::VertexOutOfRange { vertex: source, n }.into()); }
    let base = dist[source as usize];
    if base == INF { return Ok(None); }

    let mut costs = vec![base];
    let mut recorded: Vec<Option<u32>> = vec![None];
    let mut seqs = SeqArena::default();
    let mut ties_dropped = 0u64;
    let mut frontier = Frontier { heap: MinHeap::with_capacity(k.min(1024) * 3), order: 0 };

    if let Some(root) = forest.heap_of(source) {
        frontier.push(base.saturating_add(forest.arena().key(root)), root, None);
    }
    while costs.len() < k {
        let Some(cand) = frontier.heap.pop() else { break };
        let node = *forest.node(cand.node);
        let extended = if record { seqs.push(cand.node, cand.seq) } else { None };
        log::trace!("pop cost={} sidetrack {}->{} extra={}", cand.cost, node.sidetrack.origin, node.sidetrack.target, node.sidetrack.extra_cost);

        let keep = match mode {
            Mode::AllowTies => true,
            Mode::DistinctOnly => costs.last().map_or(true, |&last| cand.cost > last),
        };
        if keep {
            costs.push(cand.cost);
            recorded.push(extended);
        } else {
            ties_dropped += 1;
        }

        if let Some(next) = forest.heap_of(node.sidetrack.target) {
            frontier.push(cand.cost.saturating_add(forest.arena().key(next)), next, extended);
        }
        for child in [node.left, node.right].into_iter().flatten() {
            let delta = forest.arena().key(child) - node.sidetrack.extra_cost;
            frontier.push(cand.cost.saturating_add(delta), child, cand.seq);
        }
    }

    let insufficient = costs.len() < k;
    let sidetracks = record.then(|| recorded.iter().map(|&s| seqs.materialize(s, forest)).collect());
    let stats = ExtractStats { frontier: frontier.heap.stats(), ties_dropped };
    log::debug!(
        "extracted {} of {k} ranks from {source} ({mode:?}): frontier pushes={} pops={} max={}",
        costs.len(), stats.frontier.pushes, stats.frontier.pops, stats.frontier.max_size
    );
    Ok(Some(Ranked { costs, sidetracks, insufficient, stats }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::dijkstra;
    use crate::forest::build_forest;
    use crate::graph::Graph;

    fn prepare(g: &Graph, dest: u32) -> (Vec<Cost>, SidetrackForest) {
        let tree = dijkstra(&g.reverse(), dest).unwrap();
        let forest = build_forest(g, &tree).unwrap();
        (tree.dist, forest)
    }

    fn diamond() -> Graph {
        Graph::from_edges(5, &[(0, 1, 1), (0, 2, 5), (1, 2, 1), (1, 3, 5), (2, 3, 1)]).unwrap()
    }

    #[test]
    fn diamond_with_ties() {
        let (dist, forest) = prepare(&diamond(), 3);
        let out = extract(&dist, &forest, 0, 3, Mode::AllowTies, true).unwrap().unwrap();
        assert_eq!(out.costs, vec![3, 6, 6]);
        assert!(!out.insufficient);
        let seqs = out.sidetracks.unwrap();
        let hops: Vec<Vec<(u32, u32)>> = seqs.iter().map(|s| s.iter().map(|t| (t.origin, t.target)).collect()).collect();
        assert_eq!(hops, vec![vec![], vec![(1, 3)], vec![(0, 2)]]);
    }

    #[test]
    fn diamond_distinct() {
        let (dist, forest) = prepare(&diamond(), 3);
        let two = extract(&dist, &forest, 0, 2, Mode::DistinctOnly, false).unwrap().unwrap();
        assert_eq!(two.costs, vec![3, 6]);
        assert!(!two.insufficient);
        assert_eq!(two.sidetracks, None);

        let three = extract(&dist, &forest, 0, 3, Mode::DistinctOnly, false).unwrap().unwrap();
        assert_eq!(three.costs, vec![3, 6]);
        assert!(three.insufficient);
        assert_eq!(three.stats.ties_dropped, 1);
        assert_eq!(three.kth_cost(), Some(6));
        assert_eq!(three.padded(4, -1), vec![3, 6, -1, -1]);
        assert_eq!(three.padded(1, -1), vec![3]);
    }

    #[test]
    fn k_one_is_the_shortest_distance() {
        let (dist, forest) = prepare(&diamond(), 3);
        for mode in [Mode::AllowTies, Mode::DistinctOnly] {
            let out = extract(&dist, &forest, 0, 1, mode, true).unwrap().unwrap();
            assert_eq!(out.costs, vec![3]);
            assert_eq!(out.sidetracks, Some(vec![vec![]]));
            assert!(!out.insufficient);
        }
    }

    #[test]
    fn unreachable_and_bad_arguments() {
        let (dist, forest) = prepare(&diamond(), 3);
        assert_eq!(extract(&dist, &forest, 4, 3, Mode::AllowTies, false).unwrap(), None);
        assert!(extract(&dist, &forest, 0, 0, Mode::AllowTies, false).is_err());
        assert!(extract(&dist, &forest, 7, 1, Mode::AllowTies, false).is_err());
    }

    #[test]
    fn exhausted_forest_is_insufficient() {
        // a single walk: 0 -> 1 -> 2
        let g = Graph::from_edges(3, &[(0, 1, 2), (1, 2, 2)]).unwrap();
        let (dist, forest) = prepare(&g, 2);
        let out = extract(&dist, &forest, 0, 5, Mode::AllowTies, false).unwrap().unwrap();
        assert_eq!(out.costs, vec![4]);
        assert!(out.insufficient);
    }

    #[test]
    fn cycle_yields_unbounded_walks() {
        // 0 <-> 1 loop of cost 2 before reaching 2
        let g = Graph::from_edges(3, &[(0, 1, 1), (1, 0, 1), (1, 2, 1)]).unwrap();
        let (dist, forest) = prepare(&g, 2);
        let out = extract(&dist, &forest, 0, 4, Mode::AllowTies, true).unwrap().unwrap();
        assert_eq!(out.costs, vec![2, 4, 6, 8]);
        let lens: Vec<usize> = out.sidetracks.unwrap().iter().map(Vec::len).collect();
        assert_eq!(lens, vec![0, 1, 2, 3]);
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("ties".parse::<Mode>(), Ok(Mode::AllowTies));
        assert_eq!(" Distinct-Only ".parse::<Mode>(), Ok(Mode::DistinctOnly));
        assert!("both".parse::<Mode>().is_err());
        assert_eq!(serde_json::to_string(&Mode::DistinctOnly).unwrap(), "\"distinct_only\"");
    }
}
