//! Developer tooling: inspect predicted rotations and generate requests with
//! a known answer.
//!
//! # Invariants
//! - Tools only read the rotation model; they never run a search themselves.

mod inspector;

pub use inspector::{
    MAX_LAYER_RADIUS, RotationInspector, RotationLayer, SampleSpec, sample_offsets,
};
