//! Walks through the five-edge example graph and prints every ranked walk.

use ksp_core::{EppsteinIndex, Graph, KspConfig, Mode};

fn main() -> Result<(), ksp_core::KspError> {
    let _ = env_logger::try_init();
    let g = Graph::from_edges(5, &[(0, 1, 1), (0, 2, 5), (1, 2, 1), (1, 3, 5), (2, 3, 1)])?;
    let idx = EppsteinIndex::build(&g, 3)?;

    for (mode, k) in [(Mode::AllowTies, 3), (Mode::DistinctOnly, 2), (Mode::DistinctOnly, 3)] {
        let cfg = KspConfig::new(k, mode).with_paths();
        let outcome = idx.query_with(0, &cfg)?;
        println!("{mode:?} k={k}: {}", serde_json::to_string(outcome.costs()).unwrap_or_default());
        if let Some(ranked) = outcome.ranked() {
            if ranked.insufficient { println!("  only {} of {k} ranks exist", ranked.len()); }
            for (rank, walk) in idx.paths(0, ranked)?.iter().enumerate() {
                println!("  #{} cost={} {:?}", rank + 1, walk.cost, walk.vertices);
            }
        }
    }
    println!("from 4: {:?}", idx.query(4, 3, Mode::AllowTies, false)?);
    Ok(())
}
