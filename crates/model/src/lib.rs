//! Rotation model: predicts the texture rotation a client would render at a block.
//!
//! # Invariants
//! - Every function here is pure and total over the full `i64` coordinate domain.
//! - Arithmetic wraps exactly like the emulated 32/64-bit client code.
//! - Tables are compile-time constants shared read-only by all search workers.

pub mod mode;
pub mod random;
pub mod rotation;

pub use mode::{Mode, ModeParseError};
pub use rotation::{RotationCode, rotation_of, texture_rotation};
