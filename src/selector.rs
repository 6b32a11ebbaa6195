//! Picks the concrete tile variant a brush paints.
//!
//! A tile group's mega-tile table holds its plain variants first, then a zero,
//! then its cluttered (decorated) variants, then zeros:
//!
//! ```text
//! [5, 6, 7, 0, 9, 10, 0, 0, ...]
//!  plain--^     ^--cluttered
//! ```
//!
//! The clutter percentage is the chance of painting a cluttered variant.

use rand::Rng;

use crate::{terrain::MegaTileTable, TileGroupId, TileIndex, VARIANTS_PER_GROUP};

/// Creep has no table entries worth scanning, its variants are fixed
pub const CREEP: TileGroupId = 1;
const CREEP_PLAIN: usize = 6;
const CREEP_CLUTTERED: usize = 7;

/// Highest group whose 16 variants all fit in a [`TileIndex`]
pub const MAX_GROUP: TileGroupId = TileIndex::MAX / VARIANTS_PER_GROUP as TileIndex;

/// Returns `group * 16 + variant`. Never fails: a missing or empty table
/// picks any of the 16 addressable variants.
///
/// `group` must be at most [`MAX_GROUP`].
pub fn random_tile(
    table: Option<&MegaTileTable>,
    group: TileGroupId,
    clutter: i32,
    rng: &mut impl Rng,
) -> TileIndex {
    debug_assert!(group <= MAX_GROUP, "tile group {group} has no tile indices");
    if group == CREEP {
        let offset = if roll_percent(rng) < clutter {
            CREEP_PLAIN + uniform(rng, CREEP_CLUTTERED)
        } else {
            uniform(rng, CREEP_PLAIN)
        };
        return encode(group, offset);
    }

    let (uncluttered, cluttered) = table.map(variant_counts).unwrap_or((0, 0));
    if uncluttered == 0 && cluttered == 0 {
        log::trace!("group {group} has no variants, picking blindly");
        return encode(group, uniform(rng, VARIANTS_PER_GROUP));
    }

    let offset = if roll_percent(rng) < clutter && cluttered > 0 {
        uncluttered + 1 + uniform(rng, cluttered)
    } else {
        uniform(rng, uncluttered)
    };
    log::trace!("group {group} ({uncluttered} plain, {cluttered} cluttered) -> variant {offset}");
    return encode(group, offset);
}

/// Counts the leading run of non-zero entries and the run that starts one
/// past the first zero. A table without a zero is all plain variants.
pub fn variant_counts(table: &MegaTileTable) -> (usize, usize) {
    let uncluttered = table
        .iter()
        .position(|&id| id == 0)
        .unwrap_or(VARIANTS_PER_GROUP);
    let start = uncluttered + 1;
    let end = (start..VARIANTS_PER_GROUP)
        .find(|&i| table[i] == 0)
        .unwrap_or(VARIANTS_PER_GROUP.max(start));
    return (uncluttered, end - start);
}

/// Uniform in `[0, n)`, zero when `n` is zero
fn uniform(rng: &mut impl Rng, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    return rng.gen_range(0..n);
}

fn roll_percent(rng: &mut impl Rng) -> i32 {
    return rng.gen_range(0..100);
}

fn encode(group: TileGroupId, offset: usize) -> TileIndex {
    return (group as usize * VARIANTS_PER_GROUP + offset) as TileIndex;
}
