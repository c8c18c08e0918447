//! UCI protocol front-end.
//!
//! A dedicated reader thread owns stdin. `stop`, `ponderhit` and `quit` are
//! translated into the shared atomic flags immediately so a running search
//! reacts within its next communicate poll; every other line is queued for
//! the engine loop. The engine emits exactly one `bestmove` per `go`, after
//! that search's `info` lines.
//!
//! Protocol robustness: unparseable moves abort the rest of their move
//! list, unknown options are ignored, and a malformed `go` argument falls
//! back to an infinite search.

use crate::board::Board;
use crate::book::Book;
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{MoveFilter, generate_legal, make_move};
use crate::moves::magic::loader::load_attack_tables;
use crate::moves::perft::perft_divide;
use crate::moves::types::{Move, MoveList};
use crate::search::context::SearchContext;
use crate::search::nnue::Network;
use crate::search::search::Search;
use crate::search::time::{GoParams, SearchSignals, TimeManager, allocate};
use crate::search::tt::TranspositionTable;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

const ENGINE_NAME: &str = "Outpost 0.1";
const ENGINE_AUTHOR: &str = "the Outpost developers";

#[derive(Debug, Clone)]
pub struct UciOptions {
    pub hash_mb: usize,
    pub contempt: i32,
    pub multipv: usize,
    pub own_book: bool,
    pub book_file: String,
    pub use_nnue: bool,
    pub nnue_file: String,
    pub ponder: bool,
}

impl Default for UciOptions {
    fn default() -> Self {
        UciOptions {
            hash_mb: 64,
            contempt: 10,
            multipv: 1,
            own_book: false,
            book_file: "book.bin".to_string(),
            use_nnue: false,
            nnue_file: "net.nnue".to_string(),
            ponder: false,
        }
    }
}

pub struct Engine {
    pub board: Board,
    pub tables: AttackTables,
    pub ctx: SearchContext,
    pub tt: TranspositionTable,
    pub options: UciOptions,
    pub book: Option<Book>,
    pub network: Option<Network>,
    pub signals: Arc<SearchSignals>,
}

impl Engine {
    pub fn new() -> Self {
        let options = UciOptions::default();
        Engine {
            board: Board::new(),
            tables: load_attack_tables(),
            ctx: SearchContext::new(),
            tt: TranspositionTable::new(options.hash_mb),
            book: Book::load(&options.book_file).ok(),
            network: None,
            options,
            signals: SearchSignals::new(),
        }
    }

    /// Process one protocol line. Returns false when the engine should exit.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return true;
        };

        match command {
            "uci" => self.cmd_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => self.cmd_ucinewgame(),
            "position" => self.cmd_position(&parts),
            "go" => self.cmd_go(&parts),
            "setoption" => self.cmd_setoption(&parts),
            "quit" => return false,
            // debug conveniences
            "d" | "display" => println!("{}", self.board.to_fen()),
            "perft" => {
                let depth = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);
                perft_divide(&mut self.board, &self.tables, depth);
            }
            "bench" => self.cmd_bench(),
            "savemagics" => {
                let path = parts.get(1).copied().unwrap_or("magics.bin");
                match crate::moves::magic::loader::save_slider_snapshot(path) {
                    Ok(()) => println!("info string magic snapshot written to {}", path),
                    Err(err) => println!("info string magic snapshot failed: {}", err),
                }
            }
            _ => {}
        }
        true
    }

    fn cmd_uci(&self) {
        println!("id name {}", ENGINE_NAME);
        println!("id author {}", ENGINE_AUTHOR);
        println!("option name Hash type spin default 64 min 1 max 4096");
        println!("option name Contempt type spin default 10 min -100 max 100");
        println!("option name MultiPV type spin default 1 min 1 max 10");
        println!("option name OwnBook type check default false");
        println!("option name BookFile type string default book.bin");
        println!("option name UseNNUE type check default false");
        println!("option name NNUEFile type string default net.nnue");
        println!("option name Ponder type check default false");
        println!("uciok");
    }

    fn cmd_ucinewgame(&mut self) {
        self.board = Board::new();
        self.tt.clear();
        self.ctx.clear();
    }

    fn cmd_position(&mut self, parts: &[&str]) {
        let moves_at = parts.iter().position(|&p| p == "moves");

        let base = match parts.get(1) {
            Some(&"startpos") => Board::new(),
            Some(&"fen") => {
                let fen_end = moves_at.unwrap_or(parts.len());
                let fen = parts[2..fen_end].join(" ");
                match fen.parse::<Board>() {
                    Ok(board) => board,
                    Err(_) => return, // keep the previous position
                }
            }
            _ => Board::new(),
        };
        self.board = base;

        if let Some(idx) = moves_at {
            for token in &parts[idx + 1..] {
                match find_uci_move(&mut self.board, &self.tables, token) {
                    Some(mv) => {
                        if make_move(&mut self.board, &self.tables, mv, MoveFilter::AllMoves)
                            .is_none()
                        {
                            break;
                        }
                    }
                    // An unparseable move drops the rest of the list.
                    None => break,
                }
            }
        }
    }

    fn cmd_setoption(&mut self, parts: &[&str]) {
        let name_at = parts.iter().position(|&p| p == "name");
        let value_at = parts.iter().position(|&p| p == "value");
        let (Some(name_at), Some(value_at)) = (name_at, value_at) else {
            return;
        };
        let name = parts[name_at + 1..value_at].join(" ");
        let value = parts[value_at + 1..].join(" ");

        match name.as_str() {
            "Hash" => {
                if let Ok(mb) = value.parse::<usize>() {
                    self.options.hash_mb = mb.clamp(1, 4096);
                    self.tt.resize(self.options.hash_mb);
                }
            }
            "Contempt" => {
                if let Ok(cp) = value.parse::<i32>() {
                    self.options.contempt = cp.clamp(-100, 100);
                }
            }
            "MultiPV" => {
                if let Ok(n) = value.parse::<usize>() {
                    self.options.multipv = n.clamp(1, 10);
                }
            }
            "OwnBook" => self.options.own_book = value == "true",
            "BookFile" => {
                self.options.book_file = value;
                self.book = Book::load(&self.options.book_file).ok();
            }
            "UseNNUE" => self.options.use_nnue = value == "true",
            "NNUEFile" => {
                self.options.nnue_file = value;
                match Network::load(&self.options.nnue_file) {
                    Ok(net) => self.network = Some(net),
                    Err(err) => {
                        println!("info string failed to load network: {}", err);
                        self.network = None;
                    }
                }
            }
            "Ponder" => self.options.ponder = value == "true",
            _ => {} // unknown options are ignored
        }
    }

    /// Fixed-depth sweep over a small position suite; the node count is a
    /// quick regression signal for search changes.
    fn cmd_bench(&mut self) {
        const BENCH_DEPTH: i32 = 8;
        const BENCH_FENS: &[&str] = &[
            crate::board::START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r1bq1rk1/pp2bppp/2n2n2/3p4/3P4/2NBPN2/PP3PPP/R1BQ1RK1 w - - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
        ];

        let start = std::time::Instant::now();
        let mut total_nodes = 0u64;

        for fen in BENCH_FENS {
            let Ok(mut board) = fen.parse::<Board>() else {
                continue;
            };
            self.tt.clear();
            self.ctx.clear();

            let mut search = Search::new(
                &mut board,
                &self.tables,
                &mut self.ctx,
                &mut self.tt,
                TimeManager::fixed(None),
            );
            search.silent = true;
            let report = search.iterative_deepening(BENCH_DEPTH);

            println!(
                "info string bench depth {} nodes {} best {} fen {}",
                report.depth,
                report.nodes,
                report.best_move.to_uci(),
                fen
            );
            total_nodes += report.nodes;
        }

        let ms = start.elapsed().as_millis().max(1) as u64;
        println!(
            "info string bench total nodes {} nps {}",
            total_nodes,
            total_nodes * 1000 / ms
        );
    }

    fn cmd_go(&mut self, parts: &[&str]) {
        self.signals.reset();

        // The book answers root positions directly when enabled.
        if self.options.own_book
            && let Some(book) = &self.book
            && let Some(book_move) = book.probe(&mut self.board, &self.tables)
        {
            println!("bestmove {}", book_move.to_uci());
            return;
        }

        let params = parse_go(parts);
        let budget = allocate(&params, &self.board);
        let (allotted, deferred) = if params.ponder {
            // Pondering runs open-ended; the budget applies from ponderhit.
            (None, budget)
        } else {
            (budget, None)
        };

        let time = TimeManager::new(allotted, deferred, self.signals.clone());
        self.ctx.draw_score = -self.options.contempt;

        let mut search = Search::new(
            &mut self.board,
            &self.tables,
            &mut self.ctx,
            &mut self.tt,
            time,
        );
        search.multipv = self.options.multipv;
        if self.options.use_nnue {
            search.network = self.network.as_ref();
        }

        let max_depth = params.depth.unwrap_or(i32::MAX);
        let report = search.iterative_deepening(max_depth);

        let mut best = report.best_move;
        if best.is_null() {
            // Stopped before depth 1 completed; fall back to any legal move.
            let mut legal = MoveList::new();
            generate_legal(&mut self.board, &self.tables, &mut legal);
            best = legal.first().copied().unwrap_or(Move::NULL);
        }

        if best.is_null() {
            println!("bestmove 0000");
        } else if self.options.ponder && !report.ponder_move.is_null() {
            println!(
                "bestmove {} ponder {}",
                best.to_uci(),
                report.ponder_move.to_uci()
            );
        } else {
            println!("bestmove {}", best.to_uci());
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// Parse `go` arguments; anything malformed degrades to an infinite search.
pub fn parse_go(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();

    let infinite_fallback = |ponder: bool| GoParams {
        infinite: true,
        ponder,
        ..Default::default()
    };

    let mut i = 1;
    while i < parts.len() {
        let key = parts[i];
        let value = parts.get(i + 1).copied();

        match key {
            "depth" => {
                match value.and_then(|v| v.parse::<i32>().ok()) {
                    Some(d) => params.depth = Some(d.max(1)),
                    None => return infinite_fallback(params.ponder),
                }
                i += 1;
            }
            "movetime" | "wtime" | "btime" | "winc" | "binc" | "movestogo" => {
                let Some(number) = value.and_then(|v| v.parse::<u64>().ok()) else {
                    return infinite_fallback(params.ponder);
                };
                match key {
                    "movetime" => params.movetime = Some(number),
                    "wtime" => params.wtime = Some(number),
                    "btime" => params.btime = Some(number),
                    "winc" => params.winc = Some(number),
                    "binc" => params.binc = Some(number),
                    _ => params.movestogo = Some(number),
                }
                i += 1;
            }
            "infinite" => params.infinite = true,
            "ponder" => params.ponder = true,
            _ => {}
        }
        i += 1;
    }
    params
}

/// Resolve coordinate notation (`e2e4`, `e7e8q`) against the legal moves.
pub fn find_uci_move(board: &mut Board, tables: &AttackTables, token: &str) -> Option<Move> {
    if !token.is_ascii() || token.len() < 4 || token.len() > 5 {
        return None;
    }
    let from = crate::square::Square::from_coords(&token[0..2])?;
    let to = crate::square::Square::from_coords(&token[2..4])?;
    let promo_class = match token.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(4u8),
        Some(b'r') => Some(3u8),
        Some(b'b') => Some(2u8),
        Some(b'n') => Some(1u8),
        Some(_) => return None,
    };

    let mut legal = MoveList::new();
    generate_legal(board, tables, &mut legal);

    legal.iter().copied().find(|mv| {
        mv.from_sq() == from
            && mv.to_sq() == to
            && mv.promotion().map(|p| p % 6) == promo_class
    })
}

/// Engine entry point: reader thread plus command loop.
pub fn run() {
    let mut engine = Engine::new();
    let signals = engine.signals.clone();
    let (tx, rx) = mpsc::channel::<String>();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim().to_string();
            match trimmed.as_str() {
                "" => {}
                "stop" => signals.request_stop(),
                "ponderhit" => signals.notify_ponder_hit(),
                "quit" => {
                    signals.request_stop();
                    let _ = tx.send(trimmed);
                    return;
                }
                _ => {
                    if tx.send(trimmed).is_err() {
                        return;
                    }
                }
            }
        }
        // EOF behaves like quit.
        signals.request_stop();
        let _ = tx.send("quit".to_string());
    });

    for line in rx {
        if !engine.handle_line(&line) {
            break;
        }
    }
}
