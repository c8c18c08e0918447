//! Magic bitboards for sliding-piece attacks.
//!
//! For each square the relevant blockers are hashed with a discovered 64-bit
//! multiplier into a perfect-hash table of precomputed attack sets:
//! `((occ & mask) * magic) >> (64 - popcount(mask))`.

pub mod loader;
pub mod rays;
pub mod search;

use serde::{Deserialize, Serialize};

/// Magic data for one square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicEntry {
    /// Multiplier hashing blocker subsets into table indices.
    pub magic: u64,
    /// Right shift after multiplication: 64 − popcount(mask).
    pub shift: u32,
    /// Relevant-blocker mask (board edges excluded).
    pub mask: u64,
    /// Attack sets indexed by the magic hash.
    pub table: Box<[u64]>,
}

impl MagicEntry {
    #[inline(always)]
    pub fn lookup(&self, occupancy: u64) -> u64 {
        let index = ((occupancy & self.mask).wrapping_mul(self.magic)) >> self.shift;
        self.table[index as usize]
    }
}

/// Per-square magic entries for one slider kind.
#[derive(Debug, Serialize, Deserialize)]
pub struct SliderAttacks {
    pub entries: Vec<MagicEntry>,
}

impl SliderAttacks {
    #[inline(always)]
    pub fn get_attacks(&self, square: usize, occupancy: u64) -> u64 {
        self.entries[square].lookup(occupancy)
    }
}

#[cfg(test)]
mod tests {
    use super::loader::load_attack_tables;
    use super::rays::{bishop_attacks_traced, rook_attacks_traced};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn rook_lookup_matches_trace() {
        let tables = load_attack_tables();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sq = rng.random_range(0..64usize);
            let occ: u64 = rng.random::<u64>() & rng.random::<u64>();
            assert_eq!(
                tables.rook_attacks(sq as u8, occ),
                rook_attacks_traced(sq, occ),
                "rook mismatch at square {} occ {:#x}",
                sq,
                occ
            );
        }
    }

    #[test]
    fn bishop_lookup_matches_trace() {
        let tables = load_attack_tables();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let sq = rng.random_range(0..64usize);
            let occ: u64 = rng.random::<u64>() & rng.random::<u64>();
            assert_eq!(
                tables.bishop_attacks(sq as u8, occ),
                bishop_attacks_traced(sq, occ),
                "bishop mismatch at square {} occ {:#x}",
                sq,
                occ
            );
        }
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let tables = load_attack_tables();
        let sq = 27u8;
        let occ = (1u64 << 19) | (1u64 << 35) | (1u64 << 41);
        assert_eq!(
            tables.queen_attacks(sq, occ),
            tables.rook_attacks(sq, occ) | tables.bishop_attacks(sq, occ)
        );
    }
}
