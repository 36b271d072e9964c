use texrot_common::{Axis, BlockPos};
use texrot_model::Mode;

/// Problems detected before a search starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("observation set is empty; it would match every candidate")]
    EmptyObservationSet,
    #[error("observation #{index}: rotation {rotation} is outside 0..{limit} for {mode}")]
    InvalidObservation {
        index: usize,
        rotation: i64,
        limit: u8,
        mode: Mode,
    },
    #[error("observation #{index}: {field} {value} is not an integer")]
    NonIntegerObservation {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("observations at offset {offset} contradict each other")]
    ConflictingObservation { offset: BlockPos },
    #[error("region {axis} bounds are inverted: min {min} > max {max}")]
    InvalidRegion { axis: Axis, min: i64, max: i64 },
    #[error("unknown mode {0:?}")]
    UnknownMode(String),
}

impl ValidationError {
    /// Stable machine-readable name, used in structured output.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::EmptyObservationSet => "EmptyObservationSet",
            ValidationError::InvalidObservation { .. }
            | ValidationError::NonIntegerObservation { .. } => "InvalidObservation",
            ValidationError::ConflictingObservation { .. } => "ConflictingObservation",
            ValidationError::InvalidRegion { .. } => "InvalidRegion",
            ValidationError::UnknownMode(_) => "UnknownMode",
        }
    }
}

impl From<texrot_model::ModeParseError> for ValidationError {
    fn from(err: texrot_model::ModeParseError) -> Self {
        ValidationError::UnknownMode(err.name)
    }
}
