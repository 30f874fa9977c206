//! Perft benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example perft_bench -p chess_core -- [depth] [fen] [divide]
//!
//! Examples:
//!   # Default: depth 4 over the suite
//!   cargo flamegraph --example perft_bench -p chess_core
//!
//!   # Custom depth and position, with per-move counts
//!   cargo run --release --example perft_bench -p chess_core -- 3 "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" divide

use chess_core::{perft, perft_divide, Position};
use std::env;
use std::time::Instant;

/// Positions free of promotions at the usual bench depths
const TEST_POSITIONS: &[(&str, &str)] = &[
    (
        "Starting position",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("Position 3", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);

    // If FEN provided, use single position mode
    if let Some(fen) = args.get(2) {
        let divide = args.get(3).is_some_and(|a| a == "divide");
        run_single_position(fen, depth, divide);
    } else {
        run_all_positions(depth);
    }
}

fn run_single_position(fen: &str, depth: u8, divide: bool) {
    let mut pos = match Position::from_fen(fen) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("bad FEN: {e}");
            std::process::exit(2);
        }
    };

    println!("Position: {fen}");
    println!("Depth: {depth}");
    println!();

    if divide {
        let mut total = 0;
        for (mv, n) in perft_divide(&mut pos, depth) {
            println!("{mv}: {n}");
            total += n;
        }
        println!("\nNodes: {total}");
        return;
    }

    let start = Instant::now();
    let nodes = perft(&mut pos, depth);
    let elapsed = start.elapsed();

    let nps = if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    println!("Nodes: {nodes}");
    println!("Time: {elapsed:.3?}");
    println!("NPS: {nps:.0}");
}

fn run_all_positions(depth: u8) {
    println!("=== Perft Benchmark Suite ===");
    println!("Depth: {depth}");
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = std::time::Duration::ZERO;

    for (name, fen) in TEST_POSITIONS {
        let Ok(mut pos) = Position::from_fen(fen) else {
            continue;
        };

        print!("{name:.<30}");

        let start = Instant::now();
        let nodes = perft(&mut pos, depth);
        let elapsed = start.elapsed();

        total_nodes += nodes;
        total_time += elapsed;

        let nps = if elapsed.as_secs_f64() > 0.0 {
            nodes as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        println!(" {nodes:>12} nodes in {elapsed:>8.3?} ({nps:>10.0} nps)");
    }

    println!();
    println!("{:=<70}", "");
    println!("TOTAL: {total_nodes} nodes in {total_time:.3?}");
}
