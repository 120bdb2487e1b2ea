//! Turns a ranked sidetrack sequence back into an explicit walk.
//!
//! Starting at the source, the walk takes the next pending sidetrack as soon as
//! it stands on that sidetrack's origin and otherwise follows the tree edge
//! towards the destination. Edge ids are kept alongside the vertices so that
//! parallel arcs of different weight stay unambiguous.

use crate::error::{InvalidInput, KspError, Result};
use crate::forest::SidetrackForest;
use crate::graph::{Cost, Graph};
use crate::leftist::Sidetrack;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub vertices: Vec<u32>,
    pub edges: Vec<u32>,
    pub cost: Cost,
}

pub fn reconstruct(graph: &Graph, forest: &SidetrackForest, source: u32, sidetracks: &[Sidetrack]) -> Result<Path> {
    graph.check_vertex(source)?;
    for s in sidetracks {
        let known = s.origin < graph.vertex_count()
            && graph.edge_range(s.origin).contains(&(s.edge as usize))
            && graph.target(s.edge) == s.target;
        if !known {
            return Err(InvalidInput::UnknownSidetrack { origin: s.origin, target: s.target, edge: s.edge }.into());
        }
    }

    let destination = forest.destination();
    // a tree walk never repeats a vertex, so each leg is shorter than n
    let limit = (graph.vertex_count() as usize).saturating_mul(sidetracks.len() + 1);
    let mut pending = sidetracks.iter().peekable();
    let mut vertices = vec![source];
    let mut edges = Vec::new();
    let mut cur = source;
    loop {
        let edge = match pending.peek() {
            Some(s) if s.origin == cur => {
                let e = s.edge;
                pending.next();
                e
            }
            _ => {
                if cur == destination && pending.peek().is_none() { break; }
                forest.tree_edge(cur).ok_or_else(|| {
                    KspError::InvariantViolation(format!("walk left the shortest-path tree at vertex {cur}"))
                })?
            }
        };
        cur = graph.target(edge);
        edges.push(edge);
        vertices.push(cur);
        if edges.len() > limit {
            return Err(KspError::InvariantViolation(format!("walk from {source} exceeded {limit} steps")));
        }
    }

    let cost = graph.path_cost(&edges).ok_or_else(|| KspError::InvariantViolation("walk used an unknown edge".into()))?;
    Ok(Path { vertices, edges, cost })
}
