use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Absolute or relative integer block coordinate.
///
/// Serializes as `[x, y, z]`.
pub type BlockPos = glam::I64Vec3;

/// One of the three lattice axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component of `pos` along this axis.
    pub fn get(self, pos: BlockPos) -> i64 {
        match self {
            Axis::X => pos.x,
            Axis::Y => pos.y,
            Axis::Z => pos.z,
        }
    }

    /// Copy of `pos` with the component along this axis replaced.
    pub fn with(self, pos: BlockPos, value: i64) -> BlockPos {
        match self {
            Axis::X => BlockPos::new(value, pos.y, pos.z),
            Axis::Y => BlockPos::new(pos.x, value, pos.z),
            Axis::Z => BlockPos::new(pos.x, pos.y, value),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// `origin + delta`, wrapping on each component.
pub fn offset_pos(origin: BlockPos, delta: BlockPos) -> BlockPos {
    BlockPos::new(
        origin.x.wrapping_add(delta.x),
        origin.y.wrapping_add(delta.y),
        origin.z.wrapping_add(delta.z),
    )
}

/// Lexicographic order on (x, y, z).
pub fn canonical_cmp(a: &BlockPos, b: &BlockPos) -> Ordering {
    (a.x, a.y, a.z).cmp(&(b.x, b.y, b.z))
}

/// Sort into canonical order and drop duplicates.
pub fn sort_canonical(positions: &mut Vec<BlockPos>) {
    positions.sort_unstable_by(canonical_cmp);
    positions.dedup();
}
