//! Immutable CSR adjacency used by every stage of the pipeline.
//!
//! Layout matches the C ABI in [`crate::ffi`]: `offsets` (len n+1), `targets` and
//! `weights` (len m). The edge id of an arc is its position in `targets`, and
//! arcs of one vertex keep the order in which they were supplied.

use crate::error::{InvalidInput, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Path and distance costs. Edge weights are stored as `u32`, so any simple
/// path sum plus one more edge stays strictly below [`INF`].
pub type Cost = u64;
pub const INF: Cost = u64::MAX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CsrParts", into = "CsrParts")]
pub struct Graph {
    offsets: Vec<u32>,
    targets: Vec<u32>,
    weights: Vec<u32>,
}

/// Wire form of a [`Graph`]; validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrParts {
    pub offsets: Vec<u32>,
    pub targets: Vec<u32>,
    pub weights: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub id: u32,
    pub to: u32,
    pub weight: u32,
}

impl Graph {
    /// Builds a graph from `(from, to, weight)` triples. Arcs leaving the same
    /// vertex keep their relative input order.
    pub fn from_edges(n: u32, edges: &[(u32, u32, i64)]) -> Result<Self> {
        if edges.len() >= u32::MAX as usize {
            return Err(InvalidInput::MalformedCsr(format!("{} edges exceed the u32 edge id space", edges.len())).into());
        }
        let mut degree = vec![0u32; n as usize + 1];
        for (i, &(u, v, w)) in edges.iter().enumerate() {
            for x in [u, v] {
                if x >= n { return Err(InvalidInput::VertexOutOfRange { vertex: x, n }.into()); }
            }
            if w < 0 { return Err(InvalidInput::NegativeWeight { edge: i, weight: w }.into()); }
            if w > u32::MAX as i64 { return Err(InvalidInput::WeightOverflow { edge: i, weight: w }.into()); }
            degree[u as usize + 1] += 1;
        }
        // prefix sums -> offsets
        for i in 1..degree.len() { degree[i] += degree[i - 1]; }
        let offsets = degree;
        let mut cursor: Vec<u32> = offsets[..n as usize].to_vec();
        let mut targets = vec![0u32; edges.len()];
        let mut weights = vec![0u32; edges.len()];
        for &(u, v, w) in edges {
            let slot = cursor[u as usize] as usize;
            targets[slot] = v;
            weights[slot] = w as u32;
            cursor[u as usize] += 1;
        }
        Ok(Self { offsets, targets, weights })
    }

    /// Adopts raw CSR arrays after checking their shape.
    pub fn from_csr(offsets: Vec<u32>, targets: Vec<u32>, weights: Vec<u32>) -> Result<Self> {
        let malformed = |msg: String| -> Result<Self> { Err(InvalidInput::MalformedCsr(msg).into()) };
        if offsets.is_empty() { return malformed("offsets must hold n+1 entries".into()); }
        if offsets.len() - 1 > u32::MAX as usize { return malformed("too many vertices".into()); }
        if offsets[0] != 0 { return malformed(format!("offsets[0] = {}, expected 0", offsets[0])); }
        if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return malformed(format!("offsets decrease at vertex {i}"));
        }
        let m = *offsets.last().unwrap_or(&0) as usize;
        if targets.len() != m || weights.len() != m {
            return malformed(format!("offsets end at {m} but targets={} weights={}", targets.len(), weights.len()));
        }
        let n = (offsets.len() - 1) as u32;
        if let Some(&bad) = targets.iter().find(|&&t| t >= n) {
            return Err(InvalidInput::VertexOutOfRange { vertex: bad, n }.into());
        }
        Ok(Self { offsets, targets, weights })
    }

    #[inline] pub fn vertex_count(&self) -> u32 { (self.offsets.len() - 1) as u32 }
    #[inline] pub fn edge_count(&self) -> usize { self.targets.len() }
    #[inline] pub fn offsets(&self) -> &[u32] { &self.offsets }
    #[inline] pub fn targets(&self) -> &[u32] { &self.targets }
    #[inline] pub fn weights(&self) -> &[u32] { &self.weights }

    #[inline]
    pub fn edge_range(&self, u: u32) -> Range<usize> {
        self.offsets[u as usize] as usize..self.offsets[u as usize + 1] as usize
    }

    #[inline] pub fn target(&self, edge: u32) -> u32 { self.targets[edge as usize] }
    #[inline] pub fn weight(&self, edge: u32) -> u32 { self.weights[edge as usize] }

    /// Outgoing arcs of `u` in storage order.
    pub fn out_edges(&self, u: u32) -> impl Iterator<Item = Arc> + '_ {
        self.edge_range(u).map(move |e| Arc { id: e as u32, to: self.targets[e], weight: self.weights[e] })
    }

    pub fn check_vertex(&self, v: u32) -> Result<()> {
        let n = self.vertex_count();
        if v >= n { return Err(InvalidInput::VertexOutOfRange { vertex: v, n }.into()); }
        Ok(())
    }

    /// Graph with every arc flipped. Reverse arcs of a vertex appear in the
    /// order of their forward edge ids.
    pub fn reverse(&self) -> Graph {
        let n = self.vertex_count() as usize;
        let mut offsets = vec![0u32; n + 1];
        for &t in &self.targets { offsets[t as usize + 1] += 1; }
        for i in 1..=n { offsets[i] += offsets[i - 1]; }
        let mut cursor: Vec<u32> = offsets[..n].to_vec();
        let mut targets = vec![0u32; self.targets.len()];
        let mut weights = vec![0u32; self.targets.len()];
        for u in 0..n as u32 {
            for arc in self.out_edges(u) {
                let slot = cursor[arc.to as usize] as usize;
                targets[slot] = u;
                weights[slot] = arc.weight;
                cursor[arc.to as usize] += 1;
            }
        }
        Graph { offsets, targets, weights }
    }

    /// Sum of the weights of the given edge ids, `None` on an unknown id.
    pub fn path_cost(&self, edges: &[u32]) -> Option<Cost> {
        edges.iter().try_fold(0u64, |acc, &e| self.weights.get(e as usize).map(|&w| acc + w as u64))
    }
}

impl TryFrom<CsrParts> for Graph {
    type Error = crate::error::KspError;
    fn try_from(p: CsrParts) -> Result<Self> { Graph::from_csr(p.offsets, p.targets, p.weights) }
}

impl From<Graph> for CsrParts {
    fn from(g: Graph) -> Self { CsrParts { offsets: g.offsets, targets: g.targets, weights: g.weights } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KspError;

    fn diamond() -> Graph {
        Graph::from_edges(4, &[(0, 1, 1), (0, 2, 5), (1, 2, 1), (1, 3, 5), (2, 3, 1)]).unwrap()
    }

    #[test]
    fn csr_layout_keeps_input_order() {
        let g = Graph::from_edges(3, &[(1, 2, 7), (0, 1, 1), (0, 2, 4), (1, 0, 3)]).unwrap();
        assert_eq!(g.offsets(), &[0, 2, 4, 4]);
        let out1: Vec<_> = g.out_edges(1).map(|a| (a.to, a.weight)).collect();
        assert_eq!(out1, vec![(2, 7), (0, 3)]);
    }

    #[test]
    fn rejects_bad_edges() {
        assert!(matches!(
            Graph::from_edges(2, &[(0, 1, -1)]),
            Err(KspError::InvalidInput(InvalidInput::NegativeWeight { edge: 0, weight: -1 }))
        ));
        assert!(matches!(
            Graph::from_edges(2, &[(0, 2, 1)]),
            Err(KspError::InvalidInput(InvalidInput::VertexOutOfRange { vertex: 2, n: 2 }))
        ));
        assert!(matches!(
            Graph::from_edges(2, &[(0, 1, 1 << 40)]),
            Err(KspError::InvalidInput(InvalidInput::WeightOverflow { .. }))
        ));
    }

    #[test]
    fn rejects_malformed_csr() {
        assert!(Graph::from_csr(vec![], vec![], vec![]).is_err());
        assert!(Graph::from_csr(vec![0, 2, 1], vec![1, 0], vec![1, 1]).is_err());
        assert!(Graph::from_csr(vec![0, 1, 2], vec![1], vec![1]).is_err());
        assert!(Graph::from_csr(vec![0, 1, 1], vec![5], vec![1]).is_err());
        assert!(Graph::from_csr(vec![0, 1, 1], vec![1], vec![1]).is_ok());
    }

    #[test]
    fn reverse_flips_every_arc() {
        let g = diamond();
        let r = g.reverse();
        assert_eq!(r.edge_count(), g.edge_count());
        let into3: Vec<_> = r.out_edges(3).map(|a| (a.to, a.weight)).collect();
        assert_eq!(into3, vec![(1, 5), (2, 1)]);
        assert_eq!(r.out_edges(0).count(), 0);
        assert_eq!(r.reverse(), g);
    }

    #[test]
    fn path_cost_sums_edge_ids() {
        let g = diamond();
        assert_eq!(g.path_cost(&[0, 2, 4]), Some(3));
        assert_eq!(g.path_cost(&[]), Some(0));
        assert_eq!(g.path_cost(&[99]), None);
    }

    #[test]
    fn json_round_trip_validates() {
        let g = diamond();
        let text = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&text).unwrap();
        assert_eq!(back, g);
        let broken = r#"{"offsets":[0,1],"targets":[4],"weights":[1]}"#;
        assert!(serde_json::from_str::<Graph>(broken).is_err());
    }
}
