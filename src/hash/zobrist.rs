//! Zobrist key tables.
//!
//! Keys are drawn from a fixed-seed generator so that any two builds of the
//! engine compute identical hashes for identical positions; opening books and
//! debug tooling rely on this.

use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct ZobristKeys {
    /// [piece index 0..11][square]
    pub piece: [[u64; 64]; 12],
    /// XORed in when Black is to move.
    pub side: u64,
    /// One key per 4-bit castling mask value.
    pub castle: [u64; 16],
    /// One key per en-passant square; nothing XORed when there is none.
    pub en_passant: [u64; 64],
}

/// Process-wide keys, generated on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(rng: &mut StdRng) -> u64 {
        // zero keys would make distinct states collide trivially
        let mut v = rng.next_u64();
        while v == 0 {
            v = rng.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[0u64; 64]; 12],
        side: 0,
        castle: [0u64; 16],
        en_passant: [0u64; 64],
    };

    for index in 0..12 {
        for sq in 0..64 {
            keys.piece[index][sq] = non_zero(&mut rng);
        }
    }
    for mask in 0..16 {
        keys.castle[mask] = non_zero(&mut rng);
    }
    for sq in 0..64 {
        keys.en_passant[sq] = non_zero(&mut rng);
    }
    keys.side = non_zero(&mut rng);

    keys
}
