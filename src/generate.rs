//! Graph generators for demos, benches and randomized tests.

use crate::error::Result;
use crate::graph::Graph;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::ops::Range;

/// `n` vertices, about `m` random arcs without self-loops (parallel arcs are
/// kept), weights drawn from `weights`.
pub fn random_graph(n: u32, m: usize, seed: u64, weights: Range<u32>) -> Result<Graph> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(m);
    if n >= 2 {
        while edges.len() < m {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u == v { continue; }
            let w = if weights.is_empty() { weights.start } else { rng.gen_range(weights.clone()) };
            edges.push((u, v, w as i64));
        }
    }
    Graph::from_edges(n, &edges)
}

pub fn path_graph(n: u32, w: u32) -> Result<Graph> {
    let edges: Vec<_> = (1..n).map(|v| (v - 1, v, w as i64)).collect();
    Graph::from_edges(n, &edges)
}

pub fn complete_graph(n: u32, w: u32) -> Result<Graph> {
    let mut edges = Vec::new();
    for u in 0..n { for v in 0..n { if u != v { edges.push((u, v, w as i64)); } } }
    Graph::from_edges(n, &edges)
}

/// Two cliques of sizes `a` and `b` joined by the single arc `a-1 -> a`.
pub fn bridge_cliques(a: u32, b: u32, w: u32) -> Result<Graph> {
    let n = a + b;
    let mut edges = Vec::new();
    for u in 0..a { for v in 0..a { if u != v { edges.push((u, v, w as i64)); } } }
    if a > 0 && b > 0 { edges.push((a - 1, a, w as i64)); }
    for u in a..n { for v in a..n { if u != v { edges.push((u, v, w as i64)); } } }
    Graph::from_edges(n, &edges)
}

/// `rows x cols` grid with right and down arcs, random weights in `1..=9`.
/// Vertex `r * cols + c`; the number of monotone walks grows quickly, which
/// makes it a good stress shape for large `k`.
pub fn grid_graph(rows: u32, cols: u32, seed: u64) -> Result<Graph> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let v = r * cols + c;
            if c + 1 < cols { edges.push((v, v + 1, rng.gen_range(1..10i64))); }
            if r + 1 < rows { edges.push((v, v + cols, rng.gen_range(1..10i64))); }
        }
    }
    Graph::from_edges(rows * cols, &edges)
}
