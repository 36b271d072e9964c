//! Shared block-coordinate types used by every texrot crate.
//!
//! # Invariants
//! - Coordinate arithmetic wraps; nothing in the solver panics on overflow.
//! - Canonical ordering is ascending x, then y, then z.

mod types;

pub use types::{Axis, BlockPos, canonical_cmp, offset_pos, sort_canonical};
