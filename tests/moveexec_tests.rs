use outpost::board::Board;
use outpost::moves::execute::{MoveFilter, generate_legal, make_move, undo_move};
use outpost::moves::magic::loader::load_attack_tables;
use outpost::moves::movegen::generate_pseudo_legal;
use outpost::moves::types::MoveList;
use std::str::FromStr;

const FENS: &[&str] = &[
    outpost::board::START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1",
    "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
    "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

/// Make followed by unmake restores the board byte for byte, for every
/// pseudo-legal move of every test position.
#[test]
fn make_unmake_is_identity() {
    let tables = load_attack_tables();

    for fen in FENS {
        let mut board = Board::from_str(fen).unwrap();
        let before = board.clone();

        let mut pseudo = MoveList::new();
        generate_pseudo_legal(&board, &tables, &mut pseudo);

        for &mv in pseudo.iter() {
            if let Some(undo) = make_move(&mut board, &tables, mv, MoveFilter::AllMoves) {
                undo_move(&mut board, undo);
            }
            assert_eq!(board, before, "state not restored after {} in {}", mv, fen);
        }
    }
}

/// Board invariants hold after every legal transition: disjoint piece sets,
/// synchronized occupancies, exactly one king each.
#[test]
fn invariants_hold_after_every_move() {
    let tables = load_attack_tables();

    for fen in FENS {
        let mut board = Board::from_str(fen).unwrap();
        let mut legal = MoveList::new();
        generate_legal(&mut board, &tables, &mut legal);

        for &mv in legal.iter() {
            let undo = make_move(&mut board, &tables, mv, MoveFilter::AllMoves).unwrap();
            board.validate().unwrap_or_else(|e| panic!("{} after {} in {}", e, mv, fen));
            assert_eq!(
                board.bb(outpost::board::Color::White, outpost::board::Piece::King).count_ones(),
                1
            );
            assert_eq!(
                board.bb(outpost::board::Color::Black, outpost::board::Piece::King).count_ones(),
                1
            );
            undo_move(&mut board, undo);
        }
    }
}

/// The captures-only filter admits exactly the capture moves.
#[test]
fn captures_only_filter() {
    let tables = load_attack_tables();
    let mut board =
        Board::from_str("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let before = board.clone();

    let mut pseudo = MoveList::new();
    generate_pseudo_legal(&board, &tables, &mut pseudo);

    for &mv in pseudo.iter() {
        match make_move(&mut board, &tables, mv, MoveFilter::CapturesOnly) {
            Some(undo) => {
                assert!(mv.is_capture());
                undo_move(&mut board, undo);
            }
            None => {
                // either a non-capture or an illegal capture; state untouched
                assert_eq!(board, before);
            }
        }
    }
}

/// Castling rights die with the rook, including by capture.
#[test]
fn rook_capture_clears_rights() {
    let tables = load_attack_tables();
    let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

    let mv = outpost::uci::find_uci_move(&mut board, &tables, "a1a8").unwrap();
    make_move(&mut board, &tables, mv, MoveFilter::AllMoves).unwrap();

    // Both queen-side rights are gone: White moved its a1 rook away,
    // Black lost its a8 rook to capture.
    assert!(!board.has_queenside_castle(outpost::board::Color::White));
    assert!(!board.has_queenside_castle(outpost::board::Color::Black));
    assert!(board.has_kingside_castle(outpost::board::Color::White));
    assert!(board.has_kingside_castle(outpost::board::Color::Black));
}
