//! Builds (or loads) the complete attack-table bundle at startup.
//!
//! The slider tables are searched from a fixed seed by default, so every
//! build arrives at the same tables. The `load_magic` feature instead reads
//! a bincode snapshot previously written by `save_slider_snapshot`, skipping
//! the startup search.

use super::rays::{
    bishop_attacks_traced, bishop_mask, blocker_subset, rook_attacks_traced, rook_mask,
};
use super::search::find_magic_for_square;
use super::{MagicEntry, SliderAttacks};
use crate::moves::attacks::{AttackTables, build_king_table, build_knight_table, build_pawn_tables};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
#[cfg(feature = "load_magic")]
use tracing::debug;

const MAGIC_SEED: u64 = 0x00DE_C0DE_0000_0045;

#[cfg(feature = "load_magic")]
const SNAPSHOT_PATH: &str = "magics.bin";

#[derive(Serialize, Deserialize)]
struct SliderSnapshot {
    bishop: SliderAttacks,
    rook: SliderAttacks,
}

/// Build every attack table. Failure to discover a magic number is fatal;
/// it cannot happen with the shipped seed.
pub fn load_attack_tables() -> AttackTables {
    let (bishop, rook) = slider_tables();
    AttackTables {
        pawn: build_pawn_tables(),
        knight: build_knight_table(),
        king: build_king_table(),
        bishop,
        rook,
    }
}

#[cfg(feature = "load_magic")]
fn slider_tables() -> (SliderAttacks, SliderAttacks) {
    match std::fs::read(SNAPSHOT_PATH)
        .map_err(|e| e.to_string())
        .and_then(|bytes| bincode::deserialize::<SliderSnapshot>(&bytes).map_err(|e| e.to_string()))
    {
        Ok(snap) if snap.bishop.entries.len() == 64 && snap.rook.entries.len() == 64 => {
            debug!("loaded magic snapshot from {}", SNAPSHOT_PATH);
            (snap.bishop, snap.rook)
        }
        Ok(_) => {
            debug!("magic snapshot malformed, regenerating");
            generate_slider_tables()
        }
        Err(err) => {
            debug!("magic snapshot unavailable ({}), regenerating", err);
            generate_slider_tables()
        }
    }
}

#[cfg(not(feature = "load_magic"))]
fn slider_tables() -> (SliderAttacks, SliderAttacks) {
    generate_slider_tables()
}

/// Write the generated slider tables so later runs can skip the search.
pub fn save_slider_snapshot(path: &str) -> Result<(), String> {
    let (bishop, rook) = generate_slider_tables();
    let bytes = bincode::serialize(&SliderSnapshot { bishop, rook }).map_err(|e| e.to_string())?;
    std::fs::write(path, bytes).map_err(|e| e.to_string())
}

fn generate_slider_tables() -> (SliderAttacks, SliderAttacks) {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEED);

    #[cfg(feature = "cli")]
    let bar = indicatif::ProgressBar::new(128).with_message("building magic tables");
    #[cfg(feature = "cli")]
    bar.set_style(
        indicatif::ProgressStyle::with_template("{msg} [{bar:32}] {pos}/{len}")
            .expect("static progress template"),
    );

    let mut bishop_entries = Vec::with_capacity(64);
    let mut rook_entries = Vec::with_capacity(64);

    for square in 0..64usize {
        bishop_entries.push(build_entry(square, bishop_mask, bishop_attacks_traced, &mut rng));
        #[cfg(feature = "cli")]
        bar.inc(1);
    }
    for square in 0..64usize {
        rook_entries.push(build_entry(square, rook_mask, rook_attacks_traced, &mut rng));
        #[cfg(feature = "cli")]
        bar.inc(1);
    }

    #[cfg(feature = "cli")]
    bar.finish_and_clear();

    (
        SliderAttacks { entries: bishop_entries },
        SliderAttacks { entries: rook_entries },
    )
}

fn build_entry(
    square: usize,
    mask_fn: fn(usize) -> u64,
    attack_fn: fn(usize, u64) -> u64,
    rng: &mut StdRng,
) -> MagicEntry {
    let mask = mask_fn(square);
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let count = 1usize << bits;

    let blockers: Vec<u64> = (0..count).map(|i| blocker_subset(i, mask)).collect();
    let attacks: Vec<u64> = blockers.iter().map(|&b| attack_fn(square, b)).collect();

    let magic = find_magic_for_square(&blockers, &attacks, shift, rng)
        .unwrap_or_else(|err| panic!("magic discovery failed for square {}: {}", square, err));

    let mut table = vec![0u64; count];
    for (&blocker, &attack) in blockers.iter().zip(attacks.iter()) {
        let index = (blocker.wrapping_mul(magic) >> shift) as usize;
        table[index] = attack;
    }

    MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    }
}
