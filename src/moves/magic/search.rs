//! Random search for magic multipliers.

use rand::RngCore;

/// Sparse 64-bit candidate: AND of three draws keeps the popcount low,
/// which is what makes a multiplier likely to hash without collisions.
#[inline(always)]
pub fn random_sparse_u64<R: RngCore>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// A candidate is valid when every blocker subset hashes to a slot that is
/// either unused or already holds the same attack set (constructive
/// collisions are allowed).
pub fn is_magic_candidate_valid(blockers: &[u64], attacks: &[u64], magic: u64, shift: u32) -> bool {
    let mut table = vec![0u64; 1usize << (64 - shift)];
    let mut used = vec![false; table.len()];

    for (&blocker, &attack) in blockers.iter().zip(attacks.iter()) {
        let index = (blocker.wrapping_mul(magic) >> shift) as usize;
        if !used[index] {
            used[index] = true;
            table[index] = attack;
        } else if table[index] != attack {
            return false;
        }
    }
    true
}

pub fn find_magic_for_square<R: RngCore>(
    blockers: &[u64],
    attacks: &[u64],
    shift: u32,
    rng: &mut R,
) -> Result<u64, String> {
    for _ in 0..1_000_000 {
        let magic = random_sparse_u64(rng);
        if is_magic_candidate_valid(blockers, attacks, magic, shift) {
            return Ok(magic);
        }
    }
    Err("magic search exhausted after 1,000,000 candidates".to_string())
}
