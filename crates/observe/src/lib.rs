//! Evidence and search space: validated observation sets and candidate regions.
//!
//! # Invariants
//! - An `ObservationSet` is never empty and every code is legal for its mode.
//! - A `Region` always has `min <= max` on every axis.
//! - Validation runs before any search and never retries.

mod error;
mod observation;
mod region;

pub use error::ValidationError;
pub use observation::{CheckedObservation, Observation, ObservationSet};
pub use region::Region;
