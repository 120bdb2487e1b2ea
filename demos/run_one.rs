use ksp_core::ffi::{ksp_get_last_stats, ksp_run_eppstein, KspResultInfo, KspRunStats, KSP_MODE_ALLOW_TIES, KSP_MODE_DISTINCT_ONLY};
use ksp_core::generate::random_graph;

fn main() {
    let _ = env_logger::try_init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 { eprintln!("usage: run_one <n> <avg_degree> <seed> <k> [ties|distinct]"); std::process::exit(1); }
    let n: u32 = args[1].parse().expect("n");
    let avg_deg: f32 = args[2].parse().expect("avg_degree");
    let seed: u64 = args[3].parse().expect("seed");
    let k: u32 = args[4].parse().expect("k");
    let mode = match args.get(5).map(String::as_str).unwrap_or("ties") {
        "ties" => KSP_MODE_ALLOW_TIES,
        "distinct" => KSP_MODE_DISTINCT_ONLY,
        other => { eprintln!("bad mode {other}"); return; }
    };
    let m = (n as f32 * avg_deg) as usize;
    let g = random_graph(n, m, seed, 1..100).expect("graph");
    let dest = n.saturating_sub(1);

    let mut costs = vec![0u64; k as usize];
    let mut info = KspResultInfo::default();
    let rc = unsafe {
        ksp_run_eppstein(n, g.offsets().as_ptr(), g.targets().as_ptr(), g.weights().as_ptr(), 0, dest, k, mode, costs.as_mut_ptr(), &mut info)
    };
    if rc != 0 {
        eprintln!("error {rc}");
        return;
    }
    costs.truncate(info.returned as usize);
    let mut stats = KspRunStats::default();
    unsafe { ksp_get_last_stats(&mut stats) };
    print!(
        "n={n} m={} found={} returned={} insufficient={} relax={} sidetracks={} heap_nodes={} pushes={} pops={} frontier_max={}",
        g.edge_count(),
        info.found,
        info.returned,
        info.insufficient,
        info.relaxations,
        stats.forest.sidetracks,
        info.heap_nodes,
        info.frontier_pushes,
        info.frontier_pops,
        stats.extract.frontier.max_size
    );
    println!(" costs={costs:?}");
}
