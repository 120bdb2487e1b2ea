//! Query facade. [`EppsteinIndex`] holds everything that depends only on the
//! destination (reverse Dijkstra tree and sidetrack forest); it is read-only
//! once built, so any number of sources and `k` values can be queried against
//! it, from several threads if the caller wants to.

use crate::config::KspConfig;
use crate::dijkstra::{dijkstra, ShortestPathTree};
use crate::error::{InvalidInput, Result};
use crate::extract::{extract, Mode, Ranked};
use crate::forest::{build_forest, SidetrackForest};
use crate::graph::{Cost, Graph, INF};
use crate::leftist::Sidetrack;
use crate::path::{reconstruct, Path};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KspOutcome {
    /// The destination cannot be reached from the source.
    NotFound,
    Found(Ranked),
}

impl KspOutcome {
    #[inline] pub fn is_found(&self) -> bool { matches!(self, KspOutcome::Found(_)) }

    pub fn ranked(&self) -> Option<&Ranked> {
        match self {
            KspOutcome::Found(r) => Some(r),
            KspOutcome::NotFound => None,
        }
    }

    /// Ranked costs, empty when nothing was found.
    pub fn costs(&self) -> &[Cost] {
        match self {
            KspOutcome::Found(r) => &r.costs,
            KspOutcome::NotFound => &[],
        }
    }
}

#[derive(Debug)]
pub struct EppsteinIndex<'g> {
    graph: &'g Graph,
    tree: ShortestPathTree,
    forest: SidetrackForest,
}

impl<'g> EppsteinIndex<'g> {
    pub fn build(graph: &'g Graph, destination: u32) -> Result<Self> {
        graph.check_vertex(destination)?;
        let tree = dijkstra(&graph.reverse(), destination)?;
        let forest = build_forest(graph, &tree)?;
        Ok(Self { graph, tree, forest })
    }

    #[inline] pub fn graph(&self) -> &'g Graph { self.graph }
    #[inline] pub fn destination(&self) -> u32 { self.tree.root }
    #[inline] pub fn tree(&self) -> &ShortestPathTree { &self.tree }
    #[inline] pub fn forest(&self) -> &SidetrackForest { &self.forest }

    /// Shortest distance from `v` to the destination.
    pub fn shortest_distance(&self, v: u32) -> Option<Cost> {
        self.tree.dist.get(v as usize).copied().filter(|&d| d != INF)
    }

    pub fn query(&self, source: u32, k: usize, mode: Mode, record_paths: bool) -> Result<KspOutcome> {
        self.graph.check_vertex(source)?;
        Ok(match extract(&self.tree.dist, &self.forest, source, k, mode, record_paths)? {
            Some(ranked) => KspOutcome::Found(ranked),
            None => KspOutcome::NotFound,
        })
    }

    pub fn query_with(&self, source: u32, config: &KspConfig) -> Result<KspOutcome> {
        config.validate()?;
        self.query(source, config.k, config.mode, config.record_paths)
    }

    pub fn reconstruct(&self, source: u32, sidetracks: &[Sidetrack]) -> Result<Path> {
        reconstruct(self.graph, &self.forest, source, sidetracks)
    }

    /// Explicit walks for every rank of `ranked`; empty if sequences were not
    /// recorded.
    pub fn paths(&self, source: u32, ranked: &Ranked) -> Result<Vec<Path>> {
        ranked.sidetracks.iter().flatten().map(|seq| self.reconstruct(source, seq)).collect()
    }
}

fn check_query(graph: &Graph, source: u32, destination: u32, k: usize) -> Result<()> {
    if k == 0 { return Err(InvalidInput::ZeroK.into()); }
    graph.check_vertex(source)?;
    graph.check_vertex(destination)
}

/// Up to `k` ranked walk costs from `source` to `destination`.
pub fn compute_k_shortest(graph: &Graph, source: u32, destination: u32, k: usize, mode: Mode) -> Result<KspOutcome> {
    check_query(graph, source, destination, k)?;
    EppsteinIndex::build(graph, destination)?.query(source, k, mode, false)
}

/// Like [`compute_k_shortest`] with mode, `k` and path recording taken from
/// `config`.
pub fn compute_k_shortest_with(graph: &Graph, source: u32, destination: u32, config: &KspConfig) -> Result<KspOutcome> {
    config.validate()?;
    check_query(graph, source, destination, config.k)?;
    EppsteinIndex::build(graph, destination)?.query_with(source, config)
}

/// Explicit walk for one recorded sidetrack sequence.
pub fn reconstruct_path(graph: &Graph, source: u32, destination: u32, sidetracks: &[Sidetrack]) -> Result<Path> {
    graph.check_vertex(source)?;
    EppsteinIndex::build(graph, destination)?.reconstruct(source, sidetracks)
}
