use ksp_core::generate::{grid_graph, random_graph};
use ksp_core::{EppsteinIndex, Graph, KspConfig, Mode};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn run_one(label: &str, g: &Graph, source: u32, dest: u32, k: usize, mode: Mode) -> serde_json::Value {
    let t0 = Instant::now();
    let idx = match EppsteinIndex::build(g, dest) {
        Ok(idx) => idx,
        Err(e) => return serde_json::json!({ "graph": label, "error": e.to_string() }),
    };
    let dt_build = t0.elapsed().as_secs_f64() * 1000.0;
    let t1 = Instant::now();
    let outcome = match idx.query(source, k, mode, false) {
        Ok(o) => o,
        Err(e) => return serde_json::json!({ "graph": label, "error": e.to_string() }),
    };
    let dt_query = t1.elapsed().as_secs_f64() * 1000.0;
    let mut obj = serde_json::json!({
        "graph": label, "n": g.vertex_count(), "m": g.edge_count(), "k": k, "mode": mode,
        "build_ms": dt_build, "query_ms": dt_query,
        "relaxations": idx.tree().stats.relaxations,
        "forest": idx.forest().stats(),
        "found": outcome.is_found(),
    });
    if let (Some(r), serde_json::Value::Object(map)) = (outcome.ranked(), &mut obj) {
        map.insert("returned".into(), r.len().into());
        map.insert("insufficient".into(), r.insufficient.into());
        map.insert("kth_cost".into(), serde_json::json!(r.kth_cost()));
        map.insert("extract".into(), serde_json::json!(r.stats));
    }
    obj
}

fn main() {
    let _ = env_logger::try_init();
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help") {
        eprintln!("Usage: bench_ksp --sizes 10000,20000 --degrees 2,4,8 --seed 42 --out benchmarks/ksp_sample.json [--grid 60] (k and mode from KSP_K / KSP_MODE)");
        return;
    }
    let cfg = match KspConfig::from_env() {
        Ok(c) if c.k > 1 => c,
        Ok(c) => KspConfig { k: 1000, ..c },
        Err(e) => { eprintln!("{e}"); std::process::exit(2); }
    };
    let sizes_arg = args.iter().position(|a| a == "--sizes").and_then(|i| args.get(i + 1)).cloned().unwrap_or("10000,20000".into());
    let degrees_arg = args.iter().position(|a| a == "--degrees").and_then(|i| args.get(i + 1)).cloned().unwrap_or("4".into());
    let grid: Option<u32> = args.iter().position(|a| a == "--grid").and_then(|i| args.get(i + 1)).and_then(|v| v.parse().ok());
    let seed: u64 = args.iter().position(|a| a == "--seed").and_then(|i| args.get(i + 1)).and_then(|v| v.parse().ok()).unwrap_or(42);
    let out_path = args.iter().position(|a| a == "--out").and_then(|i| args.get(i + 1)).cloned().unwrap_or("benchmarks/ksp_sample.json".into());

    let sizes: Vec<u32> = sizes_arg.split(',').filter_map(|s| s.parse().ok()).collect();
    let degrees: Vec<f32> = degrees_arg.split(',').filter_map(|s| s.parse().ok()).collect();
    let mut results = Vec::new();
    for &n in &sizes {
        for &deg in &degrees {
            let g = random_graph(n, (n as f32 * deg) as usize, seed, 1..100).expect("graph");
            results.push(run_one(&format!("random_d{deg}"), &g, 0, n - 1, cfg.k, cfg.mode));
        }
    }
    if let Some(side) = grid {
        let g = grid_graph(side, side, seed).expect("grid");
        results.push(run_one(&format!("grid_{side}x{side}"), &g, 0, side * side - 1, cfg.k, cfg.mode));
    }
    let json = serde_json::Value::Array(results);
    if let Some(dir) = std::path::Path::new(&out_path).parent() { std::fs::create_dir_all(dir).ok(); }
    let mut f = File::create(&out_path).expect("create out");
    f.write_all(serde_json::to_string_pretty(&json).expect("json").as_bytes()).expect("write out");
    eprintln!("wrote {out_path}");
}
