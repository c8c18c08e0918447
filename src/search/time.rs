//! Time budgeting and cooperative cancellation.
//!
//! The search is single-threaded; the only cross-thread traffic is a pair
//! of atomic flags set by the input reader. The search polls them through
//! `TimeManager::communicate` every 2048 nodes.

use crate::board::{Board, Color};
use crate::search::eval::game_phase;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Flags shared with the stdin reader thread.
#[derive(Default)]
pub struct SearchSignals {
    stop: AtomicBool,
    ponder_hit: AtomicBool,
}

impl SearchSignals {
    pub fn new() -> Arc<Self> {
        Arc::new(SearchSignals::default())
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn notify_ponder_hit(&self) {
        self.ponder_hit.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Consume a pending ponderhit, if any.
    pub fn take_ponder_hit(&self) -> bool {
        self.ponder_hit.swap(false, Ordering::Relaxed)
    }

    /// Clear both flags before a new search.
    pub fn reset(&self) {
        self.stop.store(false, Ordering::Relaxed);
        self.ponder_hit.store(false, Ordering::Relaxed);
    }
}

/// Parsed `go` arguments.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub depth: Option<i32>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub infinite: bool,
    pub ponder: bool,
}

/// Per-move budget from the clock. None means no limit.
pub fn allocate(params: &GoParams, board: &Board) -> Option<Duration> {
    if params.infinite {
        return None;
    }

    if let Some(movetime) = params.movetime {
        return Some(Duration::from_millis(movetime.saturating_sub(50).max(10)));
    }

    let (time, inc) = match board.side_to_move {
        Color::White => (params.wtime?, params.winc.unwrap_or(0)),
        Color::Black => (params.btime?, params.binc.unwrap_or(0)),
    };

    // Game phase from minor/major piece counts: 24 at the start, 0 when
    // only pawns and kings remain.
    let phase = game_phase(board);

    let expected_moves = match params.movestogo {
        Some(mtg) => mtg.max(1),
        None => (20 + phase as u64).clamp(15, 50),
    };

    let mut alloc = time / expected_moves;
    alloc += inc * 4 / 5;

    // Middlegame positions deserve a little more thought.
    if phase > 16 {
        alloc = alloc * 11 / 10;
    }

    // Never commit more than a fraction of what is left.
    let cap = if time > 60_000 {
        time / 5
    } else if time > 10_000 {
        time / 6
    } else if time > 3_000 {
        time / 8
    } else {
        time / 10
    };
    alloc = alloc.min(cap);

    let buffer = if time < 1_000 {
        5
    } else if time < 3_000 {
        10
    } else {
        30
    };
    alloc = alloc.saturating_sub(buffer).max(10);

    Some(Duration::from_millis(alloc))
}

pub struct TimeManager {
    start: Instant,
    /// Hard budget for this move; None while pondering or infinite.
    allotted: Option<Duration>,
    /// Budget to install when a ponderhit arrives.
    deferred: Option<Duration>,
    signals: Arc<SearchSignals>,
    pub stopped: bool,
}

impl TimeManager {
    pub fn new(
        allotted: Option<Duration>,
        deferred: Option<Duration>,
        signals: Arc<SearchSignals>,
    ) -> Self {
        TimeManager {
            start: Instant::now(),
            allotted,
            deferred,
            signals,
            stopped: false,
        }
    }

    /// Fixed budget, no signal wiring; used by tests and perft tooling.
    pub fn fixed(allotted: Option<Duration>) -> Self {
        TimeManager::new(allotted, None, SearchSignals::new())
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The periodic cancellation check. A ponderhit converts the open-ended
    /// search into a timed one, measured from this instant.
    pub fn communicate(&mut self) {
        if self.stopped {
            return;
        }
        if self.signals.stop_requested() {
            self.stopped = true;
            return;
        }
        if self.signals.take_ponder_hit()
            && let Some(budget) = self.deferred.take()
        {
            self.start = Instant::now();
            self.allotted = Some(budget);
        }
        if let Some(limit) = self.allotted
            && self.start.elapsed() >= limit
        {
            self.stopped = true;
        }
    }

    /// Soft stop between iterations: 60 % of the budget spent.
    pub fn past_soft_limit(&self) -> bool {
        match self.allotted {
            Some(limit) => self.start.elapsed() > limit.mul_f64(0.6),
            None => false,
        }
    }

    /// Hard stop between iterations: 80 % of the budget spent.
    pub fn past_hard_limit(&self) -> bool {
        match self.allotted {
            Some(limit) => self.start.elapsed() > limit.mul_f64(0.8),
            None => false,
        }
    }
}
