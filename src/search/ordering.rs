//! Move-ordering scores.
//!
//! Every generated move gets a band score; the picker then selects by
//! linear scan for the best remaining, so moves past a cutoff are never
//! fully sorted.
//!
//! | band          | moves                                  |
//! |---------------|----------------------------------------|
//! | 30000         | hash move                              |
//! | 28000         | queen promotion                        |
//! | 25000+        | under-promotion                        |
//! | 15000..16000  | winning capture (MVV/LVA + cap-history)|
//! | 9000 / 8500   | killers                                |
//! | 8000          | counter-move                           |
//! | −8000..8000   | quiet (history + butterfly/4)          |
//! | negative      | losing capture, at its SEE value       |

use crate::board::{Board, Piece, class_of, color_of};
use crate::moves::attacks::AttackTables;
use crate::moves::types::Move;
use crate::search::context::SearchContext;
use crate::search::see::SeeExt;

pub const HASH_MOVE_SCORE: i32 = 30_000;
pub const QUEEN_PROMO_SCORE: i32 = 28_000;
pub const UNDER_PROMO_SCORE: i32 = 25_000;
pub const WINNING_CAPTURE_SCORE: i32 = 15_000;
pub const KILLER_1_SCORE: i32 = 9_000;
pub const KILLER_2_SCORE: i32 = 8_500;
pub const COUNTER_MOVE_SCORE: i32 = 8_000;
pub const QUIET_CLAMP: i32 = 8_000;

/// Most-valuable-victim / least-valuable-attacker, small enough to stay
/// inside the winning-capture band.
#[inline]
pub fn mvv_lva(mv: Move, board: &Board) -> i32 {
    let victim = if mv.is_en_passant() {
        Piece::Pawn
    } else {
        match board.piece_type_at(mv.to_sq()) {
            Some(p) => p,
            None => return 0,
        }
    };
    victim.value() / 10 + (5 - class_of(mv.piece()) as i32)
}

/// Victim class of a capture, for capture-history indexing.
#[inline]
pub fn victim_class(mv: Move, board: &Board) -> usize {
    if mv.is_en_passant() {
        Piece::Pawn as usize
    } else {
        board
            .piece_type_at(mv.to_sq())
            .map(|p| p as usize)
            .unwrap_or(Piece::Pawn as usize)
    }
}

pub fn score_move(
    mv: Move,
    board: &Board,
    tables: &AttackTables,
    ctx: &SearchContext,
    ply: usize,
    hash_move: Move,
) -> i32 {
    if mv == hash_move {
        return HASH_MOVE_SCORE;
    }

    if let Some(promo) = mv.promotion() {
        return match class_of(promo) {
            Piece::Queen => QUEEN_PROMO_SCORE,
            other => UNDER_PROMO_SCORE + other as i32,
        };
    }

    if mv.is_capture() {
        let see = board.see(mv, tables);
        if see >= 0 {
            let caphist = ctx.capture_history[mv.piece() as usize]
                [mv.to_sq().index() as usize][victim_class(mv, board)];
            return WINNING_CAPTURE_SCORE + mvv_lva(mv, board) + (caphist / 16).clamp(0, 875);
        }
        return see;
    }

    if ctx.killers[ply][0] == mv {
        return KILLER_1_SCORE;
    }
    if ctx.killers[ply][1] == mv {
        return KILLER_2_SCORE;
    }
    if ctx.counter_to(ctx.prev_moves[ply]) == mv {
        return COUNTER_MOVE_SCORE;
    }

    let side = color_of(mv.piece());
    let history = ctx.history[mv.piece() as usize][mv.to_sq().index() as usize];
    let butterfly = ctx.butterfly[side as usize][mv.from_sq().index() as usize]
        [mv.to_sq().index() as usize];
    (history + butterfly / 4).clamp(-QUIET_CLAMP, QUIET_CLAMP)
}
