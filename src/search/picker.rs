//! Scored move picker.
//!
//! Generates all pseudo-legal moves up front, scores each once, then hands
//! them out best-first via a selection scan over the remaining tail. Nodes
//! that cut off early never pay for ordering the rest.

use crate::board::Board;
use crate::moves::attacks::AttackTables;
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::types::{Move, MoveList};
use crate::search::context::SearchContext;
use crate::search::ordering::score_move;
use arrayvec::ArrayVec;

pub struct MovePicker {
    moves: MoveList,
    scores: ArrayVec<i32, 256>,
    next_index: usize,
}

impl MovePicker {
    pub fn new(
        board: &Board,
        tables: &AttackTables,
        ctx: &SearchContext,
        ply: usize,
        hash_move: Move,
    ) -> Self {
        let mut moves = MoveList::new();
        generate_pseudo_legal(board, tables, &mut moves);

        let mut scores = ArrayVec::new();
        for &mv in moves.iter() {
            scores.push(score_move(mv, board, tables, ctx, ply, hash_move));
        }

        MovePicker {
            moves,
            scores,
            next_index: 0,
        }
    }

    /// Best remaining move and its score, or None when exhausted.
    pub fn next(&mut self) -> Option<(Move, i32)> {
        if self.next_index >= self.moves.len() {
            return None;
        }

        let mut best = self.next_index;
        for i in (self.next_index + 1)..self.moves.len() {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }

        self.moves.swap(self.next_index, best);
        self.scores.swap(self.next_index, best);

        let picked = (self.moves[self.next_index], self.scores[self.next_index]);
        self.next_index += 1;
        Some(picked)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
