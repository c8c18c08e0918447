use outpost::board::Board;
use outpost::moves::execute::{MoveFilter, make_move};
use outpost::moves::magic::loader::load_attack_tables;
use outpost::uci::find_uci_move;

fn play(board: &mut Board, tables: &outpost::moves::attacks::AttackTables, line: &[&str]) {
    for token in line {
        let mv = find_uci_move(board, tables, token).expect("legal move in line");
        make_move(board, tables, mv, MoveFilter::AllMoves).expect("line applies");
    }
}

/// Knight shuffles repeat the starting position; the third occurrence is a
/// threefold.
#[test]
fn threefold_detected_on_third_occurrence() {
    let tables = load_attack_tables();
    let mut board = Board::new();

    assert_eq!(board.repetition_count(), 1);
    assert!(!board.is_repetition());

    play(&mut board, &tables, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(board.is_repetition());
    assert_eq!(board.repetition_count(), 2);
    assert!(!board.is_threefold());

    play(&mut board, &tables, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(board.repetition_count(), 3);
    assert!(board.is_threefold());
}

/// A repetition needs the same side to move: one knight out-and-back by
/// each side recreates the start position, but the half-way points differ.
#[test]
fn intermediate_positions_are_not_repetitions() {
    let tables = load_attack_tables();
    let mut board = Board::new();

    play(&mut board, &tables, &["g1f3", "g8f6", "f3g1"]);
    // Position differs from anything seen with Black to move.
    assert!(!board.is_repetition());
}

/// Castling-rights loss makes a visually identical position distinct.
#[test]
fn rights_loss_breaks_repetition() {
    use std::str::FromStr;
    let tables = load_attack_tables();
    let mut board = Board::from_str("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();

    play(&mut board, &tables, &["e1e2", "e8e7", "e2e1", "e7e8"]);
    // The kings are back, but White's king trip burned the Q right.
    assert!(!board.is_repetition());
}
