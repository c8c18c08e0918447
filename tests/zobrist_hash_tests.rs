use outpost::board::Board;
use outpost::moves::execute::{MoveFilter, generate_legal, make_move, undo_move};
use outpost::moves::magic::loader::load_attack_tables;
use outpost::moves::types::MoveList;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::str::FromStr;

const FENS: &[&str] = &[
    outpost::board::START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
    "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
];

/// The incremental key must equal the full recompute after every move of a
/// long random walk.
#[test]
fn incremental_key_matches_full_recompute() {
    let tables = load_attack_tables();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for fen in FENS {
        let mut board = Board::from_str(fen).unwrap();
        for _ in 0..60 {
            let mut legal = MoveList::new();
            generate_legal(&mut board, &tables, &mut legal);
            if legal.is_empty() {
                break;
            }
            let mv = legal[rng.random_range(0..legal.len())];
            make_move(&mut board, &tables, mv, MoveFilter::AllMoves).expect("legal move");
            assert_eq!(
                board.zobrist,
                board.compute_zobrist_full(),
                "incremental hash diverged after {} in {}",
                mv,
                fen
            );
        }
    }
}

/// Unwinding a random walk restores the original key at every step.
#[test]
fn keys_restore_through_unmake() {
    let tables = load_attack_tables();
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let mut board = Board::new();
    let initial = board.clone();

    let mut undos = Vec::new();
    for _ in 0..40 {
        let mut legal = MoveList::new();
        generate_legal(&mut board, &tables, &mut legal);
        if legal.is_empty() {
            break;
        }
        let mv = legal[rng.random_range(0..legal.len())];
        undos.push(make_move(&mut board, &tables, mv, MoveFilter::AllMoves).unwrap());
    }

    while let Some(undo) = undos.pop() {
        undo_move(&mut board, undo);
        assert_eq!(board.zobrist, board.compute_zobrist_full());
    }
    assert_eq!(board, initial);
}

/// Two engines fed the same FEN must agree on the key (deterministic
/// seeding), and transpositions must collide on purpose.
#[test]
fn identical_positions_identical_keys() {
    for fen in FENS {
        let a = Board::from_str(fen).unwrap();
        let b = Board::from_str(fen).unwrap();
        assert_eq!(a.zobrist, b.zobrist);
    }

    // 1.e4 e5 2.Nf3 vs 1.Nf3 e5 2.e4 transpose to the same position.
    let tables = load_attack_tables();
    let mut via_e4 = Board::new();
    let mut via_nf3 = Board::new();

    for (board, line) in [
        (&mut via_e4, ["e2e4", "e7e5", "g1f3"]),
        (&mut via_nf3, ["g1f3", "e7e5", "e2e4"]),
    ] {
        for token in line {
            let mv = outpost::uci::find_uci_move(board, &tables, token).unwrap();
            make_move(board, &tables, mv, MoveFilter::AllMoves).unwrap();
        }
    }

    assert_eq!(via_e4.zobrist, via_nf3.zobrist);
}

/// En passant and castling rights must feed the key.
#[test]
fn state_bits_affect_key() {
    let with_ep = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let without_ep = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
    assert_ne!(with_ep.zobrist, without_ep.zobrist);

    let with_rights = Board::from_str("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let without_rights = Board::from_str("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
    assert_ne!(with_rights.zobrist, without_rights.zobrist);

    let white_to_move = Board::from_str("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let black_to_move = Board::from_str("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    assert_ne!(white_to_move.zobrist, black_to_move.zobrist);
}
