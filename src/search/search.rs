//! Negamax search with alpha-beta, quiescence and iterative deepening.
//!
//! The searcher owns references to every piece of mutable search state (the
//! board, the heuristic context, the transposition table) and is driven
//! from the root by `iterative_deepening`. Cancellation is cooperative: the
//! time manager's flags are polled every 2048 nodes, and a cancelled
//! subtree's score is discarded by its caller.

use crate::board::{Board, Piece, class_of, Color};
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{MoveFilter, make_move, make_null_move, undo_move, undo_null_move};
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveList};
use crate::search::context::{MAX_PLY, SearchContext};
use crate::search::eval::evaluate;
use crate::search::nnue::Network;
use crate::search::ordering::victim_class;
use crate::search::picker::MovePicker;
use crate::search::see::SeeExt;
use crate::search::time::TimeManager;
use crate::search::tt::{Bound, MATE_THRESHOLD, TranspositionTable};

pub const INF: i32 = 32_000;
pub const MATE: i32 = 31_000;

/// Futility margins by remaining depth.
const FUTILITY_MARGIN: [i32; 7] = [0, 120, 180, 240, 300, 360, 420];
const RAZOR_MARGIN: i32 = 125;
const RFP_MARGIN: i32 = 80;
const ASPIRATION_WINDOW: i32 = 25;

pub struct SearchReport {
    pub best_move: Move,
    pub ponder_move: Move,
    pub score: i32,
    pub nodes: u64,
    pub depth: i32,
}

pub struct Search<'a> {
    pub board: &'a mut Board,
    pub tables: &'a AttackTables,
    pub ctx: &'a mut SearchContext,
    pub tt: &'a mut TranspositionTable,
    pub time: TimeManager,
    pub network: Option<&'a Network>,
    pub nodes: u64,
    /// Suppress protocol output; used by tests.
    pub silent: bool,
    pub multipv: usize,
}

impl<'a> Search<'a> {
    pub fn new(
        board: &'a mut Board,
        tables: &'a AttackTables,
        ctx: &'a mut SearchContext,
        tt: &'a mut TranspositionTable,
        time: TimeManager,
    ) -> Self {
        Search {
            board,
            tables,
            ctx,
            tt,
            time,
            network: None,
            nodes: 0,
            silent: false,
            multipv: 1,
        }
    }

    #[inline(always)]
    fn eval(&self) -> i32 {
        match self.network {
            Some(net) => net.evaluate(self.board),
            None => evaluate(self.board, self.tables),
        }
    }

    fn quiescence(&mut self, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        if self.nodes & 2047 == 0 {
            self.time.communicate();
        }
        if self.time.stopped {
            return 0;
        }
        self.nodes += 1;

        let stand_pat = self.eval();
        if ply >= MAX_PLY - 1 {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        // Delta pruning: even winning a queen cannot rescue this node.
        if stand_pat + Piece::Queen.value() < alpha {
            return alpha;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut picker = MovePicker::new(self.board, self.tables, self.ctx, ply, Move::NULL);
        while let Some((mv, score)) = picker.next() {
            if !mv.is_capture() {
                continue;
            }
            // Losing captures carry their negative SEE as score.
            if score < 0 {
                continue;
            }

            let Some(undo) = make_move(self.board, self.tables, mv, MoveFilter::CapturesOnly)
            else {
                continue;
            };
            let value = -self.quiescence(ply + 1, -beta, -alpha);
            undo_move(self.board, undo);

            if self.time.stopped {
                return alpha;
            }
            if value >= beta {
                return beta;
            }
            if value > alpha {
                alpha = value;
            }
        }
        alpha
    }

    fn negamax(&mut self, mut depth: i32, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        self.ctx.pv_length[ply] = ply;

        if self.nodes & 2047 == 0 {
            self.time.communicate();
        }
        if self.time.stopped {
            return 0;
        }
        self.nodes += 1;

        let root = ply == 0;
        let pv_node = beta - alpha > 1;

        if !root && self.board.is_repetition() {
            return self.ctx.draw_score;
        }

        let key = self.board.zobrist;
        let hash_move = self.tt.probe_move(key);
        if !root
            && let Some(score) = self.tt.probe(key, depth, alpha, beta, ply as i32)
        {
            return score;
        }

        if depth <= 0 {
            return self.quiescence(ply, alpha, beta);
        }
        if ply >= MAX_PLY - 1 {
            return self.eval();
        }

        let side = self.board.side_to_move;
        let in_check_now = in_check(self.board, side, self.tables);
        if in_check_now {
            depth += 1;
        }

        let static_eval = if in_check_now { 0 } else { self.eval() };
        self.ctx.eval_stack[ply] = static_eval;

        // Null-move pruning: hand the opponent a free move; if the reduced
        // search still fails high, this node is good enough to cut.
        if !root && !in_check_now && depth >= 3 && self.board.has_non_pawn_material(side) {
            let r = 3 + depth / 6;
            let undo = make_null_move(self.board);
            self.ctx.prev_moves[ply + 1] = Move::NULL;
            let score = -self.negamax(depth - 1 - r, ply + 1, -beta, -beta + 1);
            undo_null_move(self.board, undo);

            if self.time.stopped {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        // Razoring: hopeless shallow nodes drop straight into quiescence.
        if !in_check_now && depth <= 3 && static_eval + RAZOR_MARGIN * depth < alpha {
            let score = self.quiescence(ply, alpha, beta);
            if score < alpha {
                return alpha;
            }
        }

        // Reverse futility: a comfortable static margin over beta stands.
        if !in_check_now && depth <= 6 && static_eval - RFP_MARGIN * depth >= beta {
            return static_eval - RFP_MARGIN * depth;
        }

        let mut picker = MovePicker::new(self.board, self.tables, self.ctx, ply, hash_move);

        let original_alpha = alpha;
        let mut best_move = Move::NULL;
        let mut legal_moves = 0usize;
        let mut quiets_tried = MoveList::new();
        let prev = self.ctx.prev_moves[ply];

        while let Some((mv, _)) = picker.next() {
            if root && self.ctx.root_skip.contains(&mv) {
                continue;
            }

            let is_quiet = mv.is_quiet();

            // Late-move pruning: quiet moves far down the order are skipped
            // outright at shallow depth.
            if depth <= 7
                && !pv_node
                && !in_check_now
                && is_quiet
                && legal_moves > (3 + depth * depth) as usize
            {
                continue;
            }

            // Futility: the static eval is too far below alpha for a quiet
            // move to matter.
            if depth <= 6
                && !pv_node
                && !in_check_now
                && is_quiet
                && legal_moves > 0
                && static_eval + FUTILITY_MARGIN[depth as usize] <= alpha
            {
                continue;
            }

            // Bad captures that shed too much material are not worth a node.
            if depth <= 8
                && legal_moves > 0
                && mv.is_capture()
                && !self.board.see_ge(mv, -30 * depth * depth, self.tables)
            {
                continue;
            }

            let Some(undo) = make_move(self.board, self.tables, mv, MoveFilter::AllMoves) else {
                continue;
            };
            self.ctx.prev_moves[ply + 1] = mv;

            let gives_check = in_check(self.board, self.board.side_to_move, self.tables);
            let mut extension = if gives_check { 1 } else { 0 };
            if class_of(mv.piece()) == Piece::Pawn && pawn_on_seventh(mv, side) {
                extension += 1;
            }

            let mut score;
            if legal_moves == 0 {
                score = -self.negamax(depth - 1 + extension, ply + 1, -beta, -alpha);
            } else {
                // Late-move reduction, principal-variation search style:
                // later moves get a reduced zero-window probe first.
                let mut reduction = 0;
                if is_quiet && !in_check_now && extension == 0 {
                    reduction = self.ctx.reduction(depth, legal_moves);

                    let history =
                        self.ctx.history[mv.piece() as usize][mv.to_sq().index() as usize];
                    let is_killer = self.ctx.killers[ply].contains(&mv);
                    let is_counter = self.ctx.counter_to(prev) == mv;

                    if pv_node || is_killer || is_counter || history > 4_000 {
                        reduction -= 1;
                    }
                    if !pv_node && (depth > 8 || history < -1_000) {
                        reduction += 1;
                    }
                    reduction = reduction.min(depth - 2).max(0);
                }

                score = -self.negamax(depth - 1 - reduction + extension, ply + 1, -alpha - 1, -alpha);
                if score > alpha && (reduction > 0 || score < beta) {
                    score = -self.negamax(depth - 1 + extension, ply + 1, -beta, -alpha);
                }
            }

            undo_move(self.board, undo);
            legal_moves += 1;

            if self.time.stopped {
                // A subtree completed before cancellation is safe to keep.
                return if alpha > original_alpha { alpha } else { 0 };
            }

            if score > alpha {
                alpha = score;
                best_move = mv;
                self.ctx.update_pv(ply, mv);
            }

            if score >= beta {
                if is_quiet {
                    self.ctx.update_killer(ply, mv);
                    let bonus = (depth * depth).min(400);
                    self.ctx.quiet_bonus(side, mv, bonus);
                    self.ctx.set_counter(prev, mv);

                    // Earlier quiets that failed to cut get pushed down.
                    let malus = -(depth * depth) / 2;
                    for &q in quiets_tried.iter() {
                        self.ctx.quiet_bonus(side, q, malus);
                    }
                } else if mv.is_capture() {
                    let vc = victim_class(mv, self.board);
                    self.ctx.capture_bonus(mv, vc, 4 * depth * depth);
                }

                self.tt.store(key, depth, beta, Bound::Beta, mv, ply as i32);
                return beta;
            }

            if is_quiet {
                quiets_tried.push(mv);
            }
        }

        if legal_moves == 0 {
            return if in_check_now {
                -MATE + ply as i32
            } else {
                self.ctx.draw_score
            };
        }

        let flag = if alpha > original_alpha {
            Bound::Exact
        } else {
            Bound::Alpha
        };
        self.tt.store(key, depth, alpha, flag, best_move, ply as i32);
        alpha
    }

    /// Root controller: iterative deepening with aspiration windows.
    pub fn iterative_deepening(&mut self, max_depth: i32) -> SearchReport {
        self.ctx.new_search();
        let max_depth = max_depth.clamp(1, MAX_PLY as i32 - 1);

        let mut report = SearchReport {
            best_move: Move::NULL,
            ponder_move: Move::NULL,
            score: 0,
            nodes: 0,
            depth: 0,
        };
        let mut prev_score = 0;

        'deepening: for depth in 1..=max_depth {
            self.ctx.root_skip.clear();

            for pv_index in 1..=self.multipv {
                let mut window = ASPIRATION_WINDOW;
                let (mut alpha, mut beta) = if depth >= 5 && pv_index == 1 {
                    (prev_score - window, prev_score + window)
                } else {
                    (-INF, INF)
                };

                let score = loop {
                    let score = self.negamax(depth, 0, alpha, beta);
                    if self.time.stopped {
                        break score;
                    }
                    if score <= alpha {
                        // Fail low: widen, then open completely.
                        alpha = if window >= ASPIRATION_WINDOW * 4 {
                            -INF
                        } else {
                            window *= 4;
                            prev_score - window
                        };
                        continue;
                    }
                    if score >= beta {
                        beta = if window >= ASPIRATION_WINDOW * 4 {
                            INF
                        } else {
                            window *= 4;
                            prev_score + window
                        };
                        continue;
                    }
                    break score;
                };

                if self.time.stopped {
                    // The interrupted depth is incomplete; keep the last one.
                    break 'deepening;
                }

                let line = self.ctx.root_pv().to_vec();
                if pv_index == 1 {
                    prev_score = score;
                    report.score = score;
                    report.depth = depth;
                    report.best_move = line.first().copied().unwrap_or(Move::NULL);
                    report.ponder_move = line.get(1).copied().unwrap_or(Move::NULL);
                }

                match line.first() {
                    Some(&mv) => {
                        self.print_info(depth, pv_index, score, &line);
                        self.ctx.root_skip.push(mv);
                    }
                    // No PV: the root is mate/stalemate (first line) or the
                    // remaining-move list is exhausted (later lines).
                    None if pv_index == 1 => break 'deepening,
                    None => break,
                }
            }

            // A mate score keeps searching until the clock itself stops us:
            // a shorter mate may still be found.
            if report.score.abs() >= MATE_THRESHOLD {
                continue;
            }
            if self.time.past_hard_limit() {
                break;
            }
            if depth >= 8 && self.time.past_soft_limit() {
                break;
            }
        }

        report.nodes = self.nodes;
        report
    }

    fn print_info(&self, depth: i32, pv_index: usize, score: i32, line: &[Move]) {
        if self.silent {
            return;
        }

        let score_str = if score.abs() >= MATE_THRESHOLD {
            let plies = MATE - score.abs();
            let moves = (plies + 1) / 2;
            if score > 0 {
                format!("mate {}", moves)
            } else {
                format!("mate -{}", moves)
            }
        } else {
            format!("cp {}", score)
        };

        let ms = self.time.elapsed().as_millis().max(1) as u64;
        let nps = self.nodes * 1000 / ms;
        let pv: Vec<String> = line.iter().map(|m| m.to_uci()).collect();

        let multipv_str = if self.multipv > 1 {
            format!(" multipv {}", pv_index)
        } else {
            String::new()
        };

        println!(
            "info depth {}{} score {} nodes {} nps {} time {} pv {}",
            depth,
            multipv_str,
            score_str,
            self.nodes,
            nps,
            ms,
            pv.join(" ")
        );
    }
}

/// Did this pawn move land on the seventh rank from its owner's view?
#[inline(always)]
fn pawn_on_seventh(mv: Move, side: Color) -> bool {
    let rank = mv.to_sq().rank();
    match side {
        Color::White => rank == 1,
        Color::Black => rank == 6,
    }
}
