use texrot_common::{Axis, BlockPos};

use crate::error::ValidationError;

/// Inclusive box of candidate origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    min: BlockPos,
    max: BlockPos,
}

impl Region {
    /// Build a region; fails if `min > max` on any axis.
    pub fn new(min: BlockPos, max: BlockPos) -> Result<Self, ValidationError> {
        for axis in Axis::ALL {
            let (lo, hi) = (axis.get(min), axis.get(max));
            if lo > hi {
                return Err(ValidationError::InvalidRegion {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }
        Ok(Self { min, max })
    }

    pub fn from_bounds(
        x: (i64, i64),
        y: (i64, i64),
        z: (i64, i64),
    ) -> Result<Self, ValidationError> {
        Self::new(BlockPos::new(x.0, y.0, z.0), BlockPos::new(x.1, y.1, z.1))
    }

    /// Region holding exactly one candidate.
    pub fn single(pos: BlockPos) -> Self {
        Self { min: pos, max: pos }
    }

    pub fn min(&self) -> BlockPos {
        self.min
    }

    pub fn max(&self) -> BlockPos {
        self.max
    }

    /// Number of cells along `axis`. Up to 2^64, hence `u128`.
    pub fn axis_len(&self, axis: Axis) -> u128 {
        (i128::from(axis.get(self.max)) - i128::from(axis.get(self.min)) + 1) as u128
    }

    /// Total candidate count.
    pub fn volume(&self) -> u128 {
        // Saturates only when all three axes span nearly the full i64 range.
        self.axis_len(Axis::X)
            .saturating_mul(self.axis_len(Axis::Y))
            .saturating_mul(self.axis_len(Axis::Z))
    }

    /// Longest axis; ties prefer x, then z, then y, so wide horizontal boxes
    /// split across the horizontal plane.
    pub fn longest_axis(&self) -> Axis {
        [Axis::X, Axis::Z, Axis::Y]
            .into_iter()
            .fold(Axis::X, |best, axis| {
                if self.axis_len(axis) > self.axis_len(best) {
                    axis
                } else {
                    best
                }
            })
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        Axis::ALL
            .into_iter()
            .all(|a| (a.get(self.min)..=a.get(self.max)).contains(&a.get(pos)))
    }

    pub fn contains_region(&self, other: &Region) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Cut the longest axis into at most `parts` contiguous, disjoint,
    /// non-empty slabs covering the region, in ascending order.
    pub fn split(&self, parts: usize) -> Vec<Region> {
        let axis = self.longest_axis();
        let len = self.axis_len(axis);
        let parts = (parts.max(1) as u128).min(len);
        let base = len / parts;
        let extra = len % parts;

        let start = i128::from(axis.get(self.min));
        let mut cursor = start;
        let mut slabs = Vec::with_capacity(parts as usize);
        for i in 0..parts {
            let size = base + u128::from(i < extra);
            let lo = cursor;
            let hi = cursor + size as i128 - 1;
            slabs.push(Region {
                min: axis.with(self.min, lo as i64),
                max: axis.with(self.max, hi as i64),
            });
            cursor = hi + 1;
        }
        slabs
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}..={}]x[{}..={}]x[{}..={}]",
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z
        )
    }
}
