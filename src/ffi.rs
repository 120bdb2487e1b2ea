//! Stable C ABI over the engine: CSR arrays in, caller-owned output buffers,
//! negative return codes on error.
//!
//! Return codes: `0` ok, `-1` empty graph, `-2` vertex out of range, `-3` null
//! pointer, `-4` k == 0, `-5` malformed graph, `-6` unknown mode, `-7`
//! internal invariant violated.

use crate::dijkstra::DijkstraStats;
use crate::engine::{EppsteinIndex, KspOutcome};
use crate::error::KspError;
use crate::extract::{ExtractStats, Mode};
use crate::forest::ForestStats;
use crate::graph::Graph;
use core::slice;
use std::cell::Cell;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KspResultInfo {
    pub found: i32,           // 1 when the destination is reachable
    pub insufficient: i32,    // 1 when fewer than k ranks exist
    pub returned: u32,        // costs written to out_costs
    pub relaxations: u64,     // reverse Dijkstra relax operations
    pub frontier_pushes: u64, // extraction frontier pushes
    pub frontier_pops: u64,   // extraction frontier pops
    pub heap_nodes: u64,      // sidetrack arena size
    pub error_code: i32,      // 0 == success
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KspRunStats {
    pub dijkstra: DijkstraStats,
    pub forest: ForestStats,
    pub extract: ExtractStats,
}

pub const KSP_MODE_ALLOW_TIES: i32 = 0;
pub const KSP_MODE_DISTINCT_ONLY: i32 = 1;

thread_local! {
    static LAST_RUN_STATS: Cell<KspRunStats> = Cell::new(KspRunStats::default());
}

#[no_mangle]
pub extern "C" fn ksp_version() -> u32 { 1 }

/// Copies the stats of the last `ksp_run_eppstein` call made on this thread.
///
/// # Safety
/// `out` must be null or point to writable memory for one `KspRunStats`.
#[no_mangle]
pub unsafe extern "C" fn ksp_get_last_stats(out: *mut KspRunStats) {
    if out.is_null() { return; }
    *out = LAST_RUN_STATS.with(Cell::get);
}

/// Ranks up to `k` walk costs from `source` to `destination` into
/// `out_costs[0..info.returned]`.
///
/// # Safety
/// `offsets` must hold `n + 1` entries, `targets` and `weights` must hold
/// `offsets[n]` entries, `out_costs` must have room for `k` values and `info`
/// must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn ksp_run_eppstein(
    n: u32,
    offsets: *const u32, // len n+1
    targets: *const u32, // len m
    weights: *const u32, // len m
    source: u32,
    destination: u32,
    k: u32,
    mode: i32,
    out_costs: *mut u64, // len k
    info: *mut KspResultInfo,
) -> i32 {
    if n == 0 { return -1; }
    if source >= n || destination >= n { return -2; }
    if offsets.is_null() || targets.is_null() || weights.is_null() || out_costs.is_null() { return -3; }
    if k == 0 { return -4; }
    let mode = match mode {
        KSP_MODE_ALLOW_TIES => Mode::AllowTies,
        KSP_MODE_DISTINCT_ONLY => Mode::DistinctOnly,
        _ => return -6,
    };

    let off = slice::from_raw_parts(offsets, n as usize + 1);
    let m = off[n as usize] as usize;
    let tgt = slice::from_raw_parts(targets, m);
    let wts = slice::from_raw_parts(weights, m);
    let graph = match Graph::from_csr(off.to_vec(), tgt.to_vec(), wts.to_vec()) {
        Ok(g) => g,
        Err(e) => { log::warn!("ksp_run_eppstein: {e}"); return -5; }
    };

    let run = EppsteinIndex::build(&graph, destination).and_then(|idx| {
        let outcome = idx.query(source, k as usize, mode, false)?;
        Ok((outcome, idx.tree().stats, idx.forest().stats()))
    });
    let (outcome, dijkstra, forest) = match run {
        Ok(r) => r,
        Err(e) => { log::warn!("ksp_run_eppstein: {e}"); return fail(info, &e); }
    };

    let mut result = KspResultInfo { relaxations: dijkstra.relaxations, heap_nodes: forest.heap_nodes, ..Default::default() };
    let mut extract = ExtractStats::default();
    if let KspOutcome::Found(ranked) = &outcome {
        let out = slice::from_raw_parts_mut(out_costs, k as usize);
        out[..ranked.costs.len()].copy_from_slice(&ranked.costs);
        extract = ranked.stats;
        result.found = 1;
        result.insufficient = ranked.insufficient as i32;
        result.returned = ranked.costs.len() as u32;
        result.frontier_pushes = extract.frontier.pushes;
        result.frontier_pops = extract.frontier.pops;
    }
    LAST_RUN_STATS.with(|s| s.set(KspRunStats { dijkstra, forest, extract }));
    if !info.is_null() { *info = result; }
    0
}

unsafe fn fail(info: *mut KspResultInfo, e: &KspError) -> i32 {
    let code = e.code();
    if !info.is_null() { *info = KspResultInfo { error_code: code, ..Default::default() }; }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    // diamond 0->1(1) 0->2(5) 1->2(1) 1->3(5) 2->3(1) plus isolated vertex 4
    const OFF: [u32; 6] = [0, 2, 4, 5, 5, 5];
    const TGT: [u32; 5] = [1, 2, 2, 3, 3];
    const WTS: [u32; 5] = [1, 5, 1, 5, 1];

    fn run(source: u32, k: u32, mode: i32) -> (i32, Vec<u64>, KspResultInfo) {
        let mut out = vec![0u64; k as usize];
        let mut info = KspResultInfo::default();
        let rc = unsafe {
            ksp_run_eppstein(5, OFF.as_ptr(), TGT.as_ptr(), WTS.as_ptr(), source, 3, k, mode, out.as_mut_ptr(), &mut info as *mut _)
        };
        out.truncate(info.returned as usize);
        (rc, out, info)
    }

    #[test]
    fn ranks_through_the_abi() {
        let (rc, costs, info) = run(0, 3, KSP_MODE_ALLOW_TIES);
        assert_eq!(rc, 0);
        assert_eq!(costs, vec![3, 6, 6]);
        assert_eq!((info.found, info.insufficient), (1, 0));

        let (rc, costs, info) = run(0, 3, KSP_MODE_DISTINCT_ONLY);
        assert_eq!(rc, 0);
        assert_eq!(costs, vec![3, 6]);
        assert_eq!(info.insufficient, 1);

        let mut stats = KspRunStats::default();
        unsafe { ksp_get_last_stats(&mut stats as *mut _) };
        assert_eq!(stats.forest.sidetracks, 2);
        assert_eq!(stats.extract.ties_dropped, 1);
    }

    #[test]
    fn unreachable_source_reports_not_found() {
        let (rc, costs, info) = run(4, 2, KSP_MODE_ALLOW_TIES);
        assert_eq!(rc, 0);
        assert!(costs.is_empty());
        assert_eq!(info.found, 0);
    }

    #[test]
    fn argument_errors_map_to_codes() {
        assert_eq!(run(7, 1, KSP_MODE_ALLOW_TIES).0, -2);
        assert_eq!(run(0, 0, KSP_MODE_ALLOW_TIES).0, -4);
        assert_eq!(run(0, 1, 9).0, -6);
        let mut out = [0u64; 1];
        let rc = unsafe { ksp_run_eppstein(0, OFF.as_ptr(), TGT.as_ptr(), WTS.as_ptr(), 0, 0, 1, 0, out.as_mut_ptr(), core::ptr::null_mut()) };
        assert_eq!(rc, -1);
        let rc = unsafe { ksp_run_eppstein(5, core::ptr::null(), TGT.as_ptr(), WTS.as_ptr(), 0, 3, 1, 0, out.as_mut_ptr(), core::ptr::null_mut()) };
        assert_eq!(rc, -3);
        let bad_tgt: [u32; 5] = [1, 2, 2, 3, 9];
        let rc = unsafe { ksp_run_eppstein(5, OFF.as_ptr(), bad_tgt.as_ptr(), WTS.as_ptr(), 0, 3, 1, 0, out.as_mut_ptr(), core::ptr::null_mut()) };
        assert_eq!(rc, -5);
        assert_eq!(ksp_version(), 1);
    }
}
