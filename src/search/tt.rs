//! Transposition table.
//!
//! Direct-mapped, sized to the largest power of two fitting the configured
//! megabyte budget. Replacement is depth-preferred: a slot is overwritten
//! when empty, when the key matches, or when the stored depth does not
//! exceed the incoming one.
//!
//! Mate scores are stored relative to the storing node's distance from mate
//! and re-based onto the probing node's ply on the way out, so a mate found
//! at one ply stays correct when the position recurs elsewhere in the tree.

use crate::moves::types::Move;

/// Scores at or beyond this magnitude encode distance to mate.
pub const MATE_THRESHOLD: i32 = crate::search::search::MATE - 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    Exact = 0,
    /// Upper bound: the true score is at most the stored one.
    Alpha = 1,
    /// Lower bound: the true score is at least the stored one.
    Beta = 2,
}

#[derive(Clone, Copy)]
struct Entry {
    key: u64,
    best_move: u32,
    score: i32,
    depth: i16,
    flag: u8,
}

const EMPTY: Entry = Entry {
    key: 0,
    best_move: 0,
    score: 0,
    depth: -1,
    flag: 0,
};

pub struct TranspositionTable {
    entries: Vec<Entry>,
}

#[inline]
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

#[inline]
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Entry>();
        let budget = size_mb.max(1) * 1024 * 1024 / entry_size;

        let mut capacity = 1usize;
        while capacity * 2 <= budget {
            capacity *= 2;
        }

        TranspositionTable {
            entries: vec![EMPTY; capacity],
        }
    }

    /// Replace the table with a fresh one of the new size. Only permitted
    /// between searches.
    pub fn resize(&mut self, size_mb: usize) {
        *self = TranspositionTable::new(size_mb);
    }

    pub fn clear(&mut self) {
        self.entries.fill(EMPTY);
    }

    #[inline(always)]
    fn index(&self, key: u64) -> usize {
        key as usize & (self.entries.len() - 1)
    }

    /// Usable score for this node, or None.
    ///
    /// Exact entries return their score; upper bounds return `alpha` when
    /// they cannot beat it; lower bounds return `beta` when they prove it.
    pub fn probe(&self, key: u64, depth: i32, alpha: i32, beta: i32, ply: i32) -> Option<i32> {
        let entry = &self.entries[self.index(key)];
        if entry.key != key || (entry.depth as i32) < depth {
            return None;
        }

        let score = score_from_tt(entry.score, ply);
        match entry.flag {
            f if f == Bound::Exact as u8 => Some(score),
            f if f == Bound::Alpha as u8 && score <= alpha => Some(alpha),
            f if f == Bound::Beta as u8 && score >= beta => Some(beta),
            _ => None,
        }
    }

    /// Stored best move for ordering, regardless of depth.
    pub fn probe_move(&self, key: u64) -> Move {
        let entry = &self.entries[self.index(key)];
        if entry.key == key {
            Move::from_raw(entry.best_move)
        } else {
            Move::NULL
        }
    }

    pub fn store(&mut self, key: u64, depth: i32, score: i32, flag: Bound, best: Move, ply: i32) {
        let index = self.index(key);
        let entry = &mut self.entries[index];

        let replace = entry.depth < 0 || entry.key == key || entry.depth as i32 <= depth;
        if !replace {
            return;
        }

        // Keep a known best move when the incoming entry has none.
        let best_move = if best.is_null() && entry.key == key {
            entry.best_move
        } else {
            best.raw()
        };

        *entry = Entry {
            key,
            best_move,
            score: score_to_tt(score, ply),
            depth: depth as i16,
            flag: flag as u8,
        };
    }

    /// Number of slots, for diagnostics.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
