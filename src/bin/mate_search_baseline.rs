//! Mate-search baseline runner over seeded random game graphs.
//!
//! Usage:
//! `cargo run --release --bin mate_search_baseline`
//! `cargo run --release --bin mate_search_baseline -- --ply 9 --seeds 32 --node-limit 200000`

use std::time::Instant;

use plum_tsume::game_tree::random_tree::{random_tree, RandomTreeParams};
use plum_tsume::mate_search::node_search::MateSearchStats;
use plum_tsume::mate_search::search_config::{OPTION_MATE_NODE_LIMIT, OPTION_MATE_PLY};
use plum_tsume::mate_search::solver::MateSolver;

fn parse_arg(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u64(flag: &str, default: u64) -> Result<u64, String> {
    match parse_arg(flag) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| format!("bad value for {flag}: {e}")),
        None => Ok(default),
    }
}

fn main() -> Result<(), String> {
    let mut solver = MateSolver::default();
    if let Some(ply) = parse_arg("--ply") {
        solver
            .set_option(OPTION_MATE_PLY, &ply)
            .map_err(|e| e.to_string())?;
    }
    if let Some(limit) = parse_arg("--node-limit") {
        solver
            .set_option(OPTION_MATE_NODE_LIMIT, &limit)
            .map_err(|e| e.to_string())?;
    }
    let seeds = parse_arg_u64("--seeds", 16)?;
    let ply = solver.config().max_ply;
    let params = RandomTreeParams {
        levels: ply,
        ..RandomTreeParams::default()
    };

    println!("mate search baseline: ply={ply} seeds={seeds}");
    let started = Instant::now();
    let mut totals = MateSearchStats::default();
    let mut mates = 0usize;
    let mut aborted = 0usize;

    for seed in 0..seeds {
        let tree = random_tree(seed, params).map_err(|e| e.to_string())?;
        let mut pos = tree.position();
        let outcome = solver.solve(&mut pos).map_err(|e| e.to_string())?;
        println!(
            "seed {seed}: nodes={} mate={:?} aborted={} elapsed_us={}",
            outcome.stats.nodes,
            outcome.mate_move,
            outcome.aborted,
            outcome.elapsed.as_micros()
        );

        totals.nodes += outcome.stats.nodes;
        totals.or_nodes += outcome.stats.or_nodes;
        totals.and_nodes += outcome.stats.and_nodes;
        totals.oracle_calls += outcome.stats.oracle_calls;
        totals.repetition_skips += outcome.stats.repetition_skips;
        mates += outcome.is_mate() as usize;
        aborted += outcome.aborted as usize;
    }

    let elapsed = started.elapsed();
    let nps = if elapsed.as_secs_f64() > 0.0 {
        (totals.nodes as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };
    println!(
        "total: mates={mates} aborted={aborted} nodes={} or={} and={} oracle={} skipped_repetitions={} elapsed_ms={} nps={nps}",
        totals.nodes,
        totals.or_nodes,
        totals.and_nodes,
        totals.oracle_calls,
        totals.repetition_skips,
        elapsed.as_millis()
    );
    Ok(())
}
