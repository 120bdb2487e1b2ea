//! K shortest walks between two vertices of a non-negatively weighted
//! digraph, after Eppstein: one reverse Dijkstra from the destination, a
//! persistent leftist heap of sidetracks per vertex, then best-first
//! extraction over the heap-of-heaps.
//!
//! Walks may repeat vertices and edges. Two ranking modes are offered:
//!  - [`Mode::AllowTies`]: every walk gets a rank, equal costs included
//!  - [`Mode::DistinctOnly`]: one rank per distinct cost
//!
//! The same pipeline is exposed through a stable C ABI (`ksp_run_eppstein`).
//!
//! ```
//! use ksp_core::{compute_k_shortest, Graph, Mode};
//! let g = Graph::from_edges(4, &[(0, 1, 1), (0, 2, 5), (1, 2, 1), (1, 3, 5), (2, 3, 1)])?;
//! let out = compute_k_shortest(&g, 0, 3, 3, Mode::AllowTies)?;
//! assert_eq!(out.costs(), &[3, 6, 6]);
//! # Ok::<(), ksp_core::KspError>(())
//! ```

pub mod config;
pub mod dijkstra;
pub mod engine;
pub mod error;
pub mod extract;
pub mod ffi;
pub mod forest;
pub mod generate;
pub mod graph;
pub mod leftist;
pub mod path;
pub mod queue;

pub use config::KspConfig;
pub use engine::{compute_k_shortest, compute_k_shortest_with, reconstruct_path, EppsteinIndex, KspOutcome};
pub use error::{InvalidInput, KspError, Result};
pub use extract::{Mode, Ranked};
pub use graph::{Cost, Graph, INF};
pub use leftist::Sidetrack;
pub use path::Path;
