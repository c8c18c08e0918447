//! Applying and reversing moves.
//!
//! `make_move` mutates the board in place and returns the undo record; a
//! move that would leave the mover's king attacked is rolled back internally
//! and `None` is returned, with the pre-call state restored exactly.

use crate::board::{Board, CASTLING_RIGHTS, Color, Piece, color_of, piece_index};
use crate::hash::zobrist::zobrist_keys;
use crate::moves::attacks::AttackTables;
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveList, NullUndo, Undo};
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFilter {
    AllMoves,
    CapturesOnly,
}

/// Rook relocation for a castling move, keyed by the king's destination.
#[inline(always)]
fn castle_rook_squares(king_to: u8) -> (Square, Square) {
    match king_to {
        62 => (Square::from_index(63), Square::from_index(61)), // White O-O
        58 => (Square::from_index(56), Square::from_index(59)), // White O-O-O
        6 => (Square::from_index(7), Square::from_index(5)),    // Black O-O
        2 => (Square::from_index(0), Square::from_index(3)),    // Black O-O-O
        other => panic!("not a castling destination: {}", other),
    }
}

pub fn make_move(
    board: &mut Board,
    tables: &AttackTables,
    mv: Move,
    filter: MoveFilter,
) -> Option<Undo> {
    if filter == MoveFilter::CapturesOnly && !mv.is_capture() {
        return None;
    }

    let keys = zobrist_keys();
    let color = board.side_to_move;
    let piece = mv.piece();
    let from = mv.from_sq();
    let to = mv.to_sq();

    let mut undo = Undo {
        mv,
        captured: None,
        prev_castling: board.castling_rights,
        prev_en_passant: board.en_passant,
        prev_halfmove: board.halfmove_clock,
        prev_fullmove: board.fullmove_number,
        prev_zobrist: board.zobrist,
    };

    board.history.push(board.zobrist);

    // Old en-passant key out, if any.
    if let Some(ep) = board.en_passant {
        board.zobrist ^= keys.en_passant[ep.index() as usize];
    }
    board.en_passant = None;

    // Remove the captured piece first so the destination is free.
    if mv.is_en_passant() {
        let cap_sq = match color {
            Color::White => Square::from_index(to.index() + 8),
            Color::Black => Square::from_index(to.index() - 8),
        };
        let victim = piece_index(color.opposite(), Piece::Pawn);
        board.remove_piece(victim, cap_sq);
        undo.captured = Some((victim, cap_sq));
    } else if mv.is_capture() {
        let victim = board
            .piece_index_at(to)
            .expect("capture flag set on empty destination");
        board.remove_piece(victim, to);
        undo.captured = Some((victim, to));
    }

    // Move the piece, promoting on arrival if requested.
    board.remove_piece(piece, from);
    match mv.promotion() {
        Some(promo) => board.place_piece(promo, to),
        None => board.place_piece(piece, to),
    }

    // Double push opens an en-passant square behind the pawn.
    if mv.is_double_push() {
        let ep = match color {
            Color::White => Square::from_index(to.index() + 8),
            Color::Black => Square::from_index(to.index() - 8),
        };
        board.en_passant = Some(ep);
        board.zobrist ^= keys.en_passant[ep.index() as usize];
    }

    // Castling carries the rook along.
    if mv.is_castling() {
        let (rook_from, rook_to) = castle_rook_squares(to.index());
        let rook = piece_index(color, Piece::Rook);
        board.remove_piece(rook, rook_from);
        board.place_piece(rook, rook_to);
    }

    // Rights survive only if neither endpoint touches a king or rook home.
    let old_rights = board.castling_rights;
    let new_rights =
        old_rights & CASTLING_RIGHTS[from.index() as usize] & CASTLING_RIGHTS[to.index() as usize];
    if new_rights != old_rights {
        board.zobrist ^= keys.castle[old_rights as usize] ^ keys.castle[new_rights as usize];
        board.castling_rights = new_rights;
    }

    if mv.is_capture() || piece == piece_index(color, Piece::Pawn) {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock += 1;
    }
    if color == Color::Black {
        board.fullmove_number += 1;
    }

    board.side_to_move = color.opposite();
    board.zobrist ^= keys.side;

    #[cfg(debug_assertions)]
    board.assert_hash();

    if in_check(board, color, tables) {
        undo_move(board, undo);
        return None;
    }

    Some(undo)
}

pub fn undo_move(board: &mut Board, undo: Undo) {
    let mv = undo.mv;
    let piece = mv.piece();
    let color = color_of(piece);
    let from = mv.from_sq();
    let to = mv.to_sq();

    board.side_to_move = color;

    // Take the piece back, shrinking a promotion into its pawn.
    match mv.promotion() {
        Some(promo) => {
            board.remove_piece(promo, to);
            board.place_piece(piece, from);
        }
        None => {
            board.remove_piece(piece, to);
            board.place_piece(piece, from);
        }
    }

    if let Some((victim, cap_sq)) = undo.captured {
        board.place_piece(victim, cap_sq);
    }

    if mv.is_castling() {
        let (rook_from, rook_to) = castle_rook_squares(to.index());
        let rook = piece_index(color, Piece::Rook);
        board.remove_piece(rook, rook_to);
        board.place_piece(rook, rook_from);
    }

    board.castling_rights = undo.prev_castling;
    board.en_passant = undo.prev_en_passant;
    board.halfmove_clock = undo.prev_halfmove;
    board.fullmove_number = undo.prev_fullmove;
    board.zobrist = undo.prev_zobrist;
    board.history.pop();

    #[cfg(debug_assertions)]
    board.assert_hash();
}

/// Pass the move: flip the side and clear en passant, nothing else.
pub fn make_null_move(board: &mut Board) -> NullUndo {
    let keys = zobrist_keys();
    let undo = NullUndo {
        prev_en_passant: board.en_passant,
        prev_zobrist: board.zobrist,
    };

    board.history.push(board.zobrist);

    if let Some(ep) = board.en_passant {
        board.zobrist ^= keys.en_passant[ep.index() as usize];
    }
    board.en_passant = None;

    board.side_to_move = board.side_to_move.opposite();
    board.zobrist ^= keys.side;

    undo
}

pub fn undo_null_move(board: &mut Board, undo: NullUndo) {
    board.side_to_move = board.side_to_move.opposite();
    board.en_passant = undo.prev_en_passant;
    board.zobrist = undo.prev_zobrist;
    board.history.pop();
}

/// Fully legal moves, filtered through make/unmake.
pub fn generate_legal(board: &mut Board, tables: &AttackTables, moves: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(board, tables, &mut pseudo);

    moves.clear();
    for &mv in pseudo.iter() {
        if let Some(undo) = make_move(board, tables, mv, MoveFilter::AllMoves) {
            undo_move(board, undo);
            moves.push(mv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::loader::load_attack_tables;
    use std::str::FromStr;

    #[test]
    fn illegal_move_restores_state_exactly() {
        let tables = load_attack_tables();
        // White king pinned piece scenario: the e-file bishop cannot move.
        let mut board =
            Board::from_str("4k3/8/8/8/4r3/8/4B3/4K3 w - - 0 1").unwrap();
        let before = board.clone();

        let mut pseudo = MoveList::new();
        generate_pseudo_legal(&board, &tables, &mut pseudo);
        let bishop_move = pseudo
            .iter()
            .copied()
            .find(|m| m.to_uci() == "e2d3")
            .expect("pseudo-legal bishop move exists");

        assert!(make_move(&mut board, &tables, bishop_move, MoveFilter::AllMoves).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn captures_only_filter_rejects_quiets() {
        let tables = load_attack_tables();
        let mut board = Board::new();
        let mut pseudo = MoveList::new();
        generate_pseudo_legal(&board, &tables, &mut pseudo);
        let quiet = pseudo.iter().copied().find(|m| m.is_quiet()).unwrap();
        let before = board.clone();
        assert!(make_move(&mut board, &tables, quiet, MoveFilter::CapturesOnly).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_removes_the_bypassed_pawn() {
        let tables = load_attack_tables();
        let mut board = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mut legal = MoveList::new();
        generate_legal(&mut board, &tables, &mut legal);
        let ep = legal.iter().copied().find(|m| m.is_en_passant()).unwrap();

        let undo = make_move(&mut board, &tables, ep, MoveFilter::AllMoves).unwrap();
        assert_eq!(board.bb(Color::Black, Piece::Pawn), 0);
        undo_move(&mut board, undo);
        assert_eq!(board.bb(Color::Black, Piece::Pawn).count_ones(), 1);
    }

    #[test]
    fn castling_moves_the_rook() {
        let tables = load_attack_tables();
        let mut board = Board::from_str("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let mut legal = MoveList::new();
        generate_legal(&mut board, &tables, &mut legal);
        let oo = legal
            .iter()
            .copied()
            .find(|m| m.is_castling() && m.to_uci() == "e1g1")
            .unwrap();

        let undo = make_move(&mut board, &tables, oo, MoveFilter::AllMoves).unwrap();
        assert_eq!(board.piece_at(Square::from_coords("f1").unwrap()), Some((Color::White, Piece::Rook)));
        assert_eq!(board.piece_at(Square::from_coords("g1").unwrap()), Some((Color::White, Piece::King)));
        assert_eq!(board.castling_rights & (crate::board::CASTLE_WK | crate::board::CASTLE_WQ), 0);
        undo_move(&mut board, undo);
        assert_eq!(board.king_square(Color::White).to_string(), "e1");
    }
}
