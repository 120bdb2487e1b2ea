//! Per-vertex sidetrack heaps hung off the shortest-path tree.
//!
//! The tree is walked breadth-first from the destination. Every vertex starts
//! from its parent's heap root (a handle copy, no node is duplicated) and
//! inserts its own non-tree arcs on top, so `heap_of[v]` ends up holding every
//! sidetrack available along the tree path from `v` to the destination.

use crate::dijkstra::ShortestPathTree;
use crate::error::{KspError, Result};
use crate::graph::{Graph, INF};
use crate::leftist::{HeapRef, NodeId, Sidetrack, SidetrackArena, SidetrackNode};
use serde::{Deserialize, Serialize};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestStats {
    pub visited: u32,    // tree vertices reached by the BFS
    pub sidetracks: u64, // arcs inserted as deviations
    pub heap_nodes: u64, // arena size after construction
}

#[derive(Debug, Clone)]
pub struct SidetrackForest {
    destination: u32,
    arena: SidetrackArena,
    heap_of: Vec<HeapRef>,
    tree_edge: Vec<Option<u32>>,
    stats: ForestStats,
}

impl SidetrackForest {
    #[inline] pub fn destination(&self) -> u32 { self.destination }
    #[inline] pub fn arena(&self) -> &SidetrackArena { &self.arena }
    #[inline] pub fn heap_of(&self, v: u32) -> HeapRef { self.heap_of[v as usize] }
    #[inline] pub fn node(&self, id: NodeId) -> &SidetrackNode { self.arena.node(id) }
    /// Forward edge id `v` follows along the shortest-path tree.
    #[inline] pub fn tree_edge(&self, v: u32) -> Option<u32> { self.tree_edge[v as usize] }
    #[inline] pub fn stats(&self) -> ForestStats { self.stats }

    /// All sidetracks visible from `v`, in heap preorder.
    pub fn sidetracks_of(&self, v: u32) -> impl Iterator<Item = &Sidetrack> + '_ {
        self.arena.iter(self.heap_of(v))
    }
}

/// Builds the forest for `tree`, which must come from a Dijkstra run on the
/// reverse of `graph` rooted at the destination.
pub fn build_forest(graph: &Graph, tree: &ShortestPathTree) -> Result<SidetrackForest> {
    let n = graph.vertex_count() as usize;
    let (dist, pred, destination) = (&tree.dist, &tree.pred, tree.root);
    if dist.len() != n || pred.len() != n {
        return Err(KspError::InvariantViolation(format!("tree covers {} vertices, graph has {n}", dist.len())));
    }
    if dist[destination as usize] != 0 || pred[destination as usize].is_some() {
        return Err(KspError::InvariantViolation(format!("destination {destination} is not the tree root")));
    }

    // children lists in CSR form, ascending child id
    let mut child_off = vec![0u32; n + 1];
    for p in pred.iter().flatten() { child_off[*p as usize + 1] += 1; }
    for i in 1..=n { child_off[i] += child_off[i - 1]; }
    let mut cursor: Vec<u32> = child_off[..n].to_vec();
    let mut children = vec![0u32; child_off[n] as usize];
    for (v, p) in pred.iter().enumerate() {
        if let Some(p) = *p {
            children[cursor[p as usize] as usize] = v as u32;
            cursor[p as usize] += 1;
        }
    }

    let mut arena = SidetrackArena::with_capacity(graph.edge_count());
    let mut heap_of: Vec<HeapRef> = vec![None; n];
    let mut tree_edge: Vec<Option<u32>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut sidetracks = 0u64;
    let mut queue: Vec<u32> = Vec::with_capacity(n);
    queue.push(destination);
    visited[destination as usize] = true;

    let mut head = 0usize;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        let du = dist[u as usize];
        let parent = pred[u as usize];
        let mut heap = heap_of[u as usize];
        for arc in graph.out_edges(u) {
            let dv = dist[arc.to as usize];
            if dv == INF { continue; }
            let extra = (arc.weight as u64 + dv).checked_sub(du).ok_or_else(|| {
                KspError::InvariantViolation(format!("edge {} beats dist[{u}] = {du}", arc.id))
            })?;
            if tree_edge[u as usize].is_none() && Some(arc.to) == parent && extra == 0 {
                tree_edge[u as usize] = Some(arc.id);
                continue;
            }
            heap = arena.insert(heap, Sidetrack { origin: u, target: arc.to, edge: arc.id, extra_cost: extra });
            sidetracks += 1;
        }
        if parent.is_some() && tree_edge[u as usize].is_none() {
            return Err(KspError::InvariantViolation(format!("vertex {u} has no zero-cost arc to its tree parent")));
        }
        heap_of[u as usize] = heap;
        for &c in &children[child_off[u as usize] as usize..child_off[u as usize + 1] as usize] {
            if visited[c as usize] {
                return Err(KspError::InvariantViolation(format!("vertex {c} reached twice in the shortest-path tree")));
            }
            visited[c as usize] = true;
            heap_of[c as usize] = heap;
            queue.push(c);
        }
    }

    // anything reachable but not visited hangs off a predecessor cycle
    if let Some(v) = (0..n).find(|&v| !visited[v] && (dist[v] != INF || pred[v].is_some())) {
        return Err(KspError::InvariantViolation(format!("predecessor pointers from vertex {v} do not reach destination {destination}")));
    }

    let stats = ForestStats { visited: queue.len() as u32, sidetracks, heap_nodes: arena.len() as u64 };
    log::debug!("sidetrack forest to {destination}: visited={} sidetracks={sidetracks} heap_nodes={}", stats.visited, stats.heap_nodes);
    Ok(SidetrackForest { destination, arena, heap_of, tree_edge, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::{dijkstra, DijkstraStats};

    fn forest_for(g: &Graph, dest: u32) -> SidetrackForest {
        let tree = dijkstra(&g.reverse(), dest).unwrap();
        build_forest(g, &tree).unwrap()
    }

    fn sorted(forest: &SidetrackForest, v: u32) -> Vec<(u32, u32, u64)> {
        let mut s: Vec<_> = forest.sidetracks_of(v).map(|s| (s.origin, s.target, s.extra_cost)).collect();
        s.sort();
        s
    }

    #[test]
    fn diamond_heaps_accumulate_towards_source() {
        let g = Graph::from_edges(4, &[(0, 1, 1), (0, 2, 5), (1, 2, 1), (1, 3, 5), (2, 3, 1)]).unwrap();
        let f = forest_for(&g, 3);
        assert_eq!(f.heap_of(3), None);
        assert_eq!(f.heap_of(2), None);
        assert_eq!(sorted(&f, 1), vec![(1, 3, 3)]);
        assert_eq!(sorted(&f, 0), vec![(0, 2, 3), (1, 3, 3)]);
        assert_eq!(f.tree_edge(0), Some(0));
        assert_eq!(f.tree_edge(1), Some(2));
        assert_eq!(f.tree_edge(2), Some(4));
        assert_eq!(f.tree_edge(3), None);
        assert_eq!(f.stats().sidetracks, 2);
        f.arena().validate(f.heap_of(0)).unwrap();
    }

    #[test]
    fn only_one_parallel_tree_edge_is_skipped() {
        let g = Graph::from_edges(2, &[(0, 1, 2), (0, 1, 2), (0, 1, 3)]).unwrap();
        let f = forest_for(&g, 1);
        assert_eq!(f.tree_edge(0), Some(0));
        let s: Vec<_> = sorted(&f, 0);
        assert_eq!(s, vec![(0, 1, 0), (0, 1, 1)]);
    }

    #[test]
    fn arcs_into_unreachable_region_are_ignored() {
        // 2 is a dead end that cannot reach 1
        let g = Graph::from_edges(3, &[(0, 1, 1), (0, 2, 1), (2, 2, 1)]).unwrap();
        let f = forest_for(&g, 1);
        assert_eq!(f.heap_of(0), None);
        assert_eq!(f.heap_of(2), None);
    }

    #[test]
    fn children_share_parent_nodes() {
        // star into 0 with an extra deviation at the hub 1
        let g = Graph::from_edges(5, &[(1, 0, 1), (1, 0, 4), (2, 1, 1), (3, 1, 1), (4, 1, 1)]).unwrap();
        let f = forest_for(&g, 0);
        let hub = f.heap_of(1);
        assert!(hub.is_some());
        for leaf in 2..5 { assert_eq!(f.heap_of(leaf), hub); }
        assert_eq!(f.arena().len(), 1);
    }

    #[test]
    fn predecessor_cycle_is_rejected() {
        let g = Graph::from_edges(3, &[(0, 1, 1), (1, 0, 1), (2, 2, 0)]).unwrap();
        let tree = ShortestPathTree {
            root: 2,
            dist: vec![1, 1, 0],
            pred: vec![Some(1), Some(0), None],
            stats: DijkstraStats::default(),
        };
        let err = build_forest(&g, &tree).unwrap_err();
        assert!(matches!(err, KspError::InvariantViolation(_)), "{err}");
    }

    #[test]
    fn mismatched_tree_is_rejected() {
        let g = Graph::from_edges(3, &[(0, 1, 1)]).unwrap();
        let tree = dijkstra(&Graph::from_edges(2, &[(1, 0, 1)]).unwrap(), 1).unwrap();
        assert!(build_forest(&g, &tree).is_err());
    }
}
