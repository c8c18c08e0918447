use outpost::board::Board;
use outpost::moves::magic::loader::load_attack_tables;
use outpost::moves::perft::perft;
use std::str::FromStr;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn run_perft(fen: &str, depth: u32, expected: u64) {
    let tables = load_attack_tables();
    let mut board = Board::from_str(fen).expect("valid FEN");

    let start = std::time::Instant::now();
    let nodes = perft(&mut board, &tables, depth);
    let secs = start.elapsed().as_secs_f64().max(1e-9);
    println!("d{depth}: nodes={nodes} time={secs:.3}s nps={}", (nodes as f64 / secs) as u64);

    assert_eq!(
        nodes, expected,
        "perft mismatch at depth {depth}: got {nodes}, expected {expected}"
    );
}

#[test]
fn perft_startpos_d1() {
    run_perft(outpost::board::START_FEN, 1, 20);
}

#[test]
fn perft_startpos_d2() {
    run_perft(outpost::board::START_FEN, 2, 400);
}

#[test]
fn perft_startpos_d3() {
    run_perft(outpost::board::START_FEN, 3, 8_902);
}

#[test]
fn perft_startpos_d4() {
    run_perft(outpost::board::START_FEN, 4, 197_281);
}

#[test]
fn perft_startpos_d5() {
    run_perft(outpost::board::START_FEN, 5, 4_865_609);
}

#[test]
#[ignore = "slow; run with --ignored"]
fn perft_startpos_d6() {
    run_perft(outpost::board::START_FEN, 6, 119_060_324);
}

#[test]
fn perft_kiwipete_d1() {
    run_perft(KIWIPETE_FEN, 1, 48);
}

#[test]
fn perft_kiwipete_d2() {
    run_perft(KIWIPETE_FEN, 2, 2_039);
}

#[test]
fn perft_kiwipete_d3() {
    run_perft(KIWIPETE_FEN, 3, 97_862);
}

#[test]
fn perft_kiwipete_d4() {
    run_perft(KIWIPETE_FEN, 4, 4_085_603);
}

#[test]
#[ignore = "slow; run with --ignored"]
fn perft_kiwipete_d5() {
    run_perft(KIWIPETE_FEN, 5, 193_690_690);
}

// Two classic trap positions: en-passant discoveries and promotion storms.
#[test]
fn perft_position_3() {
    run_perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4, 43_238);
}

#[test]
fn perft_promotion_position() {
    run_perft("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 4, 182_838);
}
