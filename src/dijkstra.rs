//! Single-source Dijkstra. Run on the reverse graph from the destination it
//! yields, for every vertex, the distance *to* the destination and the next hop
//! towards it, i.e. the shortest-path tree the sidetrack forest hangs off.

use crate::error::Result;
use crate::graph::{Cost, Graph, INF};
use crate::queue::{HeapStats, MinHeap};
use serde::{Deserialize, Serialize};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DijkstraStats {
    pub relaxations: u64, // successful relax operations
    pub settled: u32,     // vertices popped with a current distance
    pub heap: HeapStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortestPathTree {
    pub root: u32,
    /// `dist[v]`: shortest distance between `root` and `v`, [`INF`] if none.
    pub dist: Vec<Cost>,
    /// `pred[v]`: neighbour of `v` one step closer to `root`.
    pub pred: Vec<Option<u32>>,
    pub stats: DijkstraStats,
}

impl ShortestPathTree {
    #[inline] pub fn reachable(&self, v: u32) -> bool { self.dist[v as usize] != INF }
}

/// Classic binary-heap Dijkstra from `source`. Stale queue entries (popped
/// distance above the current best) are dropped without effect.
pub fn dijkstra(graph: &Graph, source: u32) -> Result<ShortestPathTree> {
    graph.check_vertex(source)?;
    let n = graph.vertex_count() as usize;
    let mut dist = vec![INF; n];
    let mut pred: Vec<Option<u32>> = vec![None; n];
    let mut relaxations = 0u64;
    let mut settled = 0u32;
    dist[source as usize] = 0;

    let mut heap: MinHeap<(Cost, u32)> = MinHeap::with_capacity(n.min(1024));
    heap.push((0, source));
    while let Some((d, u)) = heap.pop() {
        if d > dist[u as usize] { continue; }
        settled += 1;
        for arc in graph.out_edges(u) {
            let nd = d + arc.weight as Cost;
            let v = arc.to as usize;
            if nd < dist[v] {
                dist[v] = nd;
                pred[v] = Some(u);
                heap.push((nd, arc.to));
                relaxations += 1;
            }
        }
    }

    let stats = DijkstraStats { relaxations, settled, heap: heap.stats() };
    log::debug!("dijkstra from {source}: settled={settled} relaxations={relaxations} heap_max={}", stats.heap.max_size);
    Ok(ShortestPathTree { root: source, dist, pred, stats })
}
