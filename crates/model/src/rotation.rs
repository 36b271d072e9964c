use texrot_common::BlockPos;

use crate::mode::Mode;
use crate::random::{JavaRandom, Xoroshiro128Plus, coordinate_hash, position_seed};

/// Texture rotation code, `0..Mode::code_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RotationCode(u8);

impl RotationCode {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// What a side face reveals of this code: rotations `r` and `r + 2`
    /// render the same side texture.
    pub const fn side_view(self) -> Self {
        Self(self.0 & 1)
    }

    /// The comparable part of the code for a full or side-only view.
    pub const fn project(self, side_only: bool) -> Self {
        if side_only { self.side_view() } else { self }
    }
}

impl std::fmt::Display for RotationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `abs(v) % 4` with two's complement `abs`; `i32::MIN` stays negative and
/// leaves remainder 0, exactly as the client computes it.
#[inline]
fn abs_mod4(v: i32) -> u8 {
    (v.wrapping_abs() % 4) as u8
}

/// Full rotation code rendered at `pos` by a client of `mode`.
#[inline]
pub fn texture_rotation(mode: Mode, pos: BlockPos) -> RotationCode {
    let code = match mode {
        Mode::Vanilla => {
            let mut rng = JavaRandom::new(position_seed(pos.x, pos.y, pos.z));
            abs_mod4(rng.next_long() as i32)
        }
        Mode::Vanilla21_1 => {
            let mut rng = JavaRandom::new(position_seed(pos.x, pos.y, pos.z));
            rng.next_int_bounded(4) as u8
        }
        Mode::Vanilla12 => abs_mod4((coordinate_hash(pos.x, pos.y, pos.z) as i32) >> 16),
        Mode::Sodium => {
            let mut rng = Xoroshiro128Plus::from_seed(position_seed(pos.x, pos.y, pos.z));
            abs_mod4(rng.next_long() as i32)
        }
        Mode::Sodium19 => {
            let mut rng = Xoroshiro128Plus::from_seed(position_seed(pos.x, pos.y, pos.z));
            rng.next_int_bounded(4) as u8
        }
    };
    RotationCode(code)
}

/// Rotation code at `pos`, projected to the side view when `side_only`.
#[inline]
pub fn rotation_of(mode: Mode, pos: BlockPos, side_only: bool) -> RotationCode {
    texture_rotation(mode, pos).project(side_only)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_zero_for_lcg_free_modes() {
        assert_eq!(texture_rotation(Mode::Vanilla12, BlockPos::ZERO).value(), 0);
    }

    #[test]
    fn codes_stay_in_range_for_all_modes() {
        for mode in Mode::ALL {
            for x in -20..20 {
                for z in -20..20 {
                    let code = texture_rotation(mode, BlockPos::new(x, 70, z));
                    assert!(code.value() < mode.code_count(), "{mode} at {x},{z}");
                }
            }
        }
    }

    #[test]
    fn side_only_projects_parity() {
        assert_eq!(RotationCode::new(3).side_view(), RotationCode::new(1));
        assert_eq!(RotationCode::new(2).project(true), RotationCode::new(0));
        assert_eq!(RotationCode::new(2).project(false), RotationCode::new(2));
    }

    #[test]
    fn side_only_agrees_with_full_code() {
        for mode in Mode::ALL {
            let pos = BlockPos::new(-123, 70, 456);
            assert_eq!(
                rotation_of(mode, pos, true),
                texture_rotation(mode, pos).side_view()
            );
        }
    }

    #[test]
    fn extreme_coordinates_do_not_panic() {
        for mode in Mode::ALL {
            let _ = texture_rotation(mode, BlockPos::new(i64::MIN, i64::MAX, i64::MIN));
            let _ = texture_rotation(mode, BlockPos::new(i64::MAX, i64::MIN, -1));
        }
    }

    #[test]
    fn abs_mod4_handles_int_min() {
        assert_eq!(abs_mod4(i32::MIN), 0);
        assert_eq!(abs_mod4(-7), 3);
    }
}
