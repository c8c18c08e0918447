//! Static Exchange Evaluation.
//!
//! Estimates the material outcome of the capture sequence starting with a
//! given move using the least-valuable-attacker swap recurrence. Sliding
//! attackers uncovered by earlier captures (X-rays) re-enter the attacker
//! set as occupancy shrinks.

use crate::bitboard::BitboardExt;
use crate::board::{Board, Color, Piece, class_of};
use crate::moves::attacks::AttackTables;
use crate::moves::types::Move;
use crate::square::Square;

#[inline(always)]
fn exchange_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 20000,
    }
}

pub trait SeeExt {
    /// Net material estimate for initiating the capture `mv`.
    /// Defined for captures only.
    fn see(&self, mv: Move, tables: &AttackTables) -> i32;

    /// `see(mv) >= threshold`; the form used at call sites.
    fn see_ge(&self, mv: Move, threshold: i32, tables: &AttackTables) -> bool {
        self.see(mv, tables) >= threshold
    }

    fn attackers_to(&self, square: u8, occupancy: u64, tables: &AttackTables) -> u64;
}

impl SeeExt for Board {
    fn attackers_to(&self, square: u8, occupancy: u64, tables: &AttackTables) -> u64 {
        let white_pawns =
            tables.pawn_attacks(Color::Black, square) & self.bb(Color::White, Piece::Pawn);
        let black_pawns =
            tables.pawn_attacks(Color::White, square) & self.bb(Color::Black, Piece::Pawn);

        let knights = tables.knight_attacks(square)
            & (self.bb(Color::White, Piece::Knight) | self.bb(Color::Black, Piece::Knight));
        let kings = tables.king_attacks(square)
            & (self.bb(Color::White, Piece::King) | self.bb(Color::Black, Piece::King));

        let diag_sliders = self.bb(Color::White, Piece::Bishop)
            | self.bb(Color::Black, Piece::Bishop)
            | self.bb(Color::White, Piece::Queen)
            | self.bb(Color::Black, Piece::Queen);
        let orth_sliders = self.bb(Color::White, Piece::Rook)
            | self.bb(Color::Black, Piece::Rook)
            | self.bb(Color::White, Piece::Queen)
            | self.bb(Color::Black, Piece::Queen);

        let diag = tables.bishop.get_attacks(square as usize, occupancy) & diag_sliders;
        let orth = tables.rook.get_attacks(square as usize, occupancy) & orth_sliders;

        (white_pawns | black_pawns | knights | kings | diag | orth) & occupancy
    }

    fn see(&self, mv: Move, tables: &AttackTables) -> i32 {
        debug_assert!(mv.is_capture(), "SEE is defined for captures only");

        let to = mv.to_sq().index();
        let from = mv.from_sq().index();

        let first_victim = if mv.is_en_passant() {
            Piece::Pawn
        } else {
            match self.piece_type_at(mv.to_sq()) {
                Some(p) => p,
                None => return 0,
            }
        };

        let mut gain = [0i32; 32];
        let mut depth = 0;
        gain[0] = exchange_value(first_victim);

        // A promoting capture swaps the pawn for the promoted piece.
        let mut next_victim = match mv.promotion() {
            Some(promo) => {
                gain[0] += exchange_value(class_of(promo)) - exchange_value(Piece::Pawn);
                class_of(promo)
            }
            None => class_of(mv.piece()),
        };

        let mut occupancy = self.occupied() & !(1u64 << from);
        let mut attackers = self.attackers_to(to, occupancy, tables);
        let mut side = self.side_to_move.opposite();

        loop {
            depth += 1;
            if depth >= 32 {
                break;
            }

            let attacker_sq = least_valuable_attacker(self, attackers, side);
            let Some(attacker_sq) = attacker_sq else { break };

            attackers &= !(1u64 << attacker_sq);
            occupancy &= !(1u64 << attacker_sq);

            // Removing a slider may uncover an X-ray attacker behind it.
            if matches!(next_victim, Piece::Pawn | Piece::Bishop | Piece::Rook | Piece::Queen) {
                attackers = self.attackers_to(to, occupancy, tables) & occupancy;
            }

            gain[depth] = exchange_value(next_victim) - gain[depth - 1];
            next_victim = self
                .piece_type_at(Square::from_index(attacker_sq))
                .expect("attacker square is occupied");
            side = side.opposite();
        }

        while depth > 1 {
            depth -= 1;
            gain[depth - 1] = -std::cmp::max(-gain[depth - 1], gain[depth]);
        }
        gain[0]
    }
}

/// Square of the cheapest attacker of `side` in the set, or None.
fn least_valuable_attacker(board: &Board, attackers: u64, side: Color) -> Option<u8> {
    let own = attackers & board.occupancy_of(side);
    if own == 0 {
        return None;
    }
    for piece in crate::board::PIECE_CLASSES {
        let subset = own & board.bb(side, piece);
        if subset != 0 {
            return Some(subset.lsb());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::execute::generate_legal;
    use crate::moves::magic::loader::load_attack_tables;
    use crate::moves::types::MoveList;
    use std::str::FromStr;

    fn capture_to(board: &mut Board, tables: &AttackTables, uci: &str) -> Move {
        let mut legal = MoveList::new();
        generate_legal(board, tables, &mut legal);
        legal
            .iter()
            .copied()
            .find(|m| m.to_uci() == uci && m.is_capture())
            .unwrap_or_else(|| panic!("capture {} not found", uci))
    }

    #[test]
    fn pawn_takes_undefended_queen_wins() {
        let tables = load_attack_tables();
        let mut b = Board::from_str("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mv = capture_to(&mut b, &tables, "e4d5");
        assert_eq!(b.see(mv, &tables), 900);
        assert!(b.see_ge(mv, 0, &tables));
        assert!(b.see_ge(mv, 900, &tables));
        assert!(!b.see_ge(mv, 901, &tables));
    }

    #[test]
    fn rook_takes_defended_pawn_loses() {
        let tables = load_attack_tables();
        // Black pawn d5 defended by pawn e6; white rook on d1 takes.
        let mut b = Board::from_str("4k3/8/4p3/3p4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mv = capture_to(&mut b, &tables, "d1d5");
        assert_eq!(b.see(mv, &tables), 100 - 500);
        assert!(!b.see_ge(mv, 0, &tables));
    }

    #[test]
    fn equal_trade_is_not_negative() {
        let tables = load_attack_tables();
        // Rook takes rook, recapture by king.
        let mut b = Board::from_str("3rk3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
        let mv = capture_to(&mut b, &tables, "d1d8");
        assert_eq!(b.see(mv, &tables), 0);
        assert!(b.see_ge(mv, 0, &tables));
    }
}
