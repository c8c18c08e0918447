//! Forsyth–Edwards Notation parsing and emission.
//!
//! `set_fen` parses onto a scratch board and commits only on success, so a
//! malformed string never corrupts the current position.

use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, EMPTY_SQ, piece_index};
use crate::square::Square;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN glyph -> flat piece index, O(1).
const CHAR_TO_PIECE: [u8; 128] = {
    let mut t = [EMPTY_SQ; 128];
    t[b'P' as usize] = 0;
    t[b'N' as usize] = 1;
    t[b'B' as usize] = 2;
    t[b'R' as usize] = 3;
    t[b'Q' as usize] = 4;
    t[b'K' as usize] = 5;
    t[b'p' as usize] = 6;
    t[b'n' as usize] = 7;
    t[b'b' as usize] = 8;
    t[b'r' as usize] = 9;
    t[b'q' as usize] = 10;
    t[b'k' as usize] = 11;
    t
};

const PIECE_TO_CHAR: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

impl Board {
    /// Load a position from FEN. On error the board is left untouched.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or("empty FEN")?;
        let side = fields.next().ok_or("missing side-to-move field")?;
        let castling = fields.next().unwrap_or("-");
        let en_passant = fields.next().unwrap_or("-");
        // Move-number fields are parsed leniently and ignored by the search.
        let halfmove = fields.next().and_then(|s| s.parse::<u16>().ok()).unwrap_or(0);
        let fullmove = fields.next().and_then(|s| s.parse::<u16>().ok()).unwrap_or(1);

        let mut board = Board::new_empty();

        // FEN lists the eighth rank first, which is internal rank 0.
        let mut rank = 0u8;
        let mut file = 0u8;
        for c in placement.chars() {
            match c {
                '/' => {
                    if file != 8 {
                        return Err(format!("rank {} has {} files", 8 - rank, file));
                    }
                    rank += 1;
                    file = 0;
                    if rank > 7 {
                        return Err("too many ranks".to_string());
                    }
                }
                '1'..='8' => {
                    file += c as u8 - b'0';
                    if file > 8 {
                        return Err(format!("rank {} overflows", 8 - rank));
                    }
                }
                _ => {
                    let index = *CHAR_TO_PIECE
                        .get(c as usize)
                        .filter(|&&i| i != EMPTY_SQ)
                        .ok_or_else(|| format!("unknown piece glyph '{}'", c))?;
                    if file > 7 {
                        return Err(format!("rank {} overflows", 8 - rank));
                    }
                    board.place_piece(index, Square::from_file_rank(file, rank));
                    file += 1;
                }
            }
        }
        if rank != 7 || file != 8 {
            return Err("incomplete placement field".to_string());
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(format!("invalid side-to-move '{}'", side)),
        };

        board.castling_rights = 0;
        if castling != "-" {
            for c in castling.chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(format!("invalid castling flag '{}'", c)),
                };
            }
        }

        board.en_passant = if en_passant == "-" {
            None
        } else {
            Some(
                Square::from_coords(en_passant)
                    .ok_or_else(|| format!("invalid en-passant square '{}'", en_passant))?,
            )
        };

        // Drop en-passant squares that cannot be a double-push artifact; a
        // bogus one would let the mover capture phantom pawns.
        if let Some(ep) = board.en_passant {
            let (required_rank, pushed_pawn_sq) = match board.side_to_move {
                Color::White => (2, ep.index().wrapping_add(8)),
                Color::Black => (5, ep.index().wrapping_sub(8)),
            };
            let pushed_pawn =
                piece_index(board.side_to_move.opposite(), super::Piece::Pawn);
            let valid = ep.rank() == required_rank
                && board.piece_index_at(ep).is_none()
                && pushed_pawn_sq < 64
                && board.piece_on_sq[pushed_pawn_sq as usize] == pushed_pawn;
            if !valid {
                board.en_passant = None;
            }
        }

        board.halfmove_clock = halfmove;
        board.fullmove_number = fullmove;

        // Reject positions without exactly one king per side; the engine's
        // invariants are undefined there.
        for color in [Color::White, Color::Black] {
            let kings = board.pieces[piece_index(color, super::Piece::King) as usize];
            if kings.count_ones() != 1 {
                return Err(format!("{:?} must have exactly one king", color));
            }
        }

        board.refresh_zobrist();
        board.history.clear();
        *self = board;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in 0..8u8 {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_index_at(sq) {
                    Some(index) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(PIECE_TO_CHAR[index as usize]);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side_to_move == Color::White { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                fen.push('K');
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                fen.push('Q');
            }
            if self.castling_rights & CASTLE_BK != 0 {
                fen.push('k');
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn startpos_roundtrip() {
        let b = Board::from_str(START_FEN).unwrap();
        assert_eq!(b.to_fen(), START_FEN);
    }

    #[test]
    fn kiwipete_roundtrip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let b = Board::from_str(fen).unwrap();
        assert_eq!(b.to_fen(), fen);
    }

    #[test]
    fn en_passant_square_parses() {
        let b = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(b.en_passant.unwrap().to_string(), "d6");
    }

    #[test]
    fn error_leaves_board_untouched() {
        let mut b = Board::new();
        let before = b.clone();
        assert!(b.set_fen("not a fen").is_err());
        assert!(b.set_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err()); // no kings
        assert_eq!(b, before);
    }
}
