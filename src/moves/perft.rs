//! Perft: exhaustive legal-move tree counting for movegen validation.

use crate::board::Board;
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{MoveFilter, make_move, undo_move};
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::types::MoveList;
use tracing::{debug, instrument};

fn perft_inner(board: &mut Board, tables: &AttackTables, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_pseudo_legal(board, tables, &mut moves);

    let mut nodes = 0;
    for &mv in moves.iter() {
        if let Some(undo) = make_move(board, tables, mv, MoveFilter::AllMoves) {
            nodes += if depth == 1 {
                1
            } else {
                perft_inner(board, tables, depth - 1)
            };
            undo_move(board, undo);
        }
    }
    nodes
}

#[instrument(skip(board, tables))]
pub fn perft(board: &mut Board, tables: &AttackTables, depth: u32) -> u64 {
    let nodes = perft_inner(board, tables, depth);
    debug!(nodes, "perft complete");
    nodes
}

/// Per-root-move breakdown, printed in `move: count` form for diffing
/// against a reference engine.
pub fn perft_divide(board: &mut Board, tables: &AttackTables, depth: u32) -> u64 {
    let mut moves = MoveList::new();
    generate_pseudo_legal(board, tables, &mut moves);

    let mut total = 0;
    for &mv in moves.iter() {
        if let Some(undo) = make_move(board, tables, mv, MoveFilter::AllMoves) {
            let nodes = if depth <= 1 {
                1
            } else {
                perft_inner(board, tables, depth - 1)
            };
            undo_move(board, undo);
            println!("{}: {}", mv.to_uci(), nodes);
            total += nodes;
        }
    }
    println!("total: {}", total);
    total
}
