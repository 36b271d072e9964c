use std::collections::HashMap;

use texrot_common::{BlockPos, offset_pos};
use texrot_model::{Mode, RotationCode, rotation_of};

use crate::error::ValidationError;

/// One piece of raw evidence: the rotation seen at an offset from the
/// unknown origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub offset: BlockPos,
    pub rotation: i64,
    /// Only a side face of the block was visible.
    pub side_only: bool,
}

impl Observation {
    pub fn new(offset: BlockPos, rotation: i64, side_only: bool) -> Self {
        Self {
            offset,
            rotation,
            side_only,
        }
    }

    pub fn top(x: i64, y: i64, z: i64, rotation: i64) -> Self {
        Self::new(BlockPos::new(x, y, z), rotation, false)
    }

    pub fn side(x: i64, y: i64, z: i64, rotation: i64) -> Self {
        Self::new(BlockPos::new(x, y, z), rotation, true)
    }
}

/// An observation whose code has been range-checked and projected for its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedObservation {
    offset: BlockPos,
    expected: RotationCode,
    side_only: bool,
}

impl CheckedObservation {
    pub fn offset(&self) -> BlockPos {
        self.offset
    }

    /// Expected code, already projected to the side view when `side_only`.
    pub fn expected(&self) -> RotationCode {
        self.expected
    }

    pub fn side_only(&self) -> bool {
        self.side_only
    }

    /// Number of codes out of `code_count` this observation accepts.
    /// Lower is more selective.
    pub fn accepted_codes(&self, mode: Mode) -> u8 {
        if self.side_only {
            mode.code_count() / 2
        } else {
            1
        }
    }

    /// Whether a client of `mode` renders this observation with the candidate
    /// `origin` as the observer position.
    #[inline]
    pub fn holds_at(&self, mode: Mode, origin: BlockPos) -> bool {
        rotation_of(mode, offset_pos(origin, self.offset), self.side_only) == self.expected
    }
}

/// Non-empty, validated observations in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationSet {
    mode: Mode,
    checked: Vec<CheckedObservation>,
}

impl ObservationSet {
    /// Validate `raw` for `mode` and order it most selective first.
    ///
    /// Exact duplicates collapse, a side-only observation implied by a full
    /// one at the same offset is dropped, and contradictions are rejected.
    pub fn normalize(mode: Mode, raw: &[Observation]) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::EmptyObservationSet);
        }

        let limit = mode.code_count();
        let mut checked: Vec<CheckedObservation> = Vec::with_capacity(raw.len());
        let mut by_offset: HashMap<BlockPos, usize> = HashMap::with_capacity(raw.len());

        for (index, obs) in raw.iter().enumerate() {
            if !(0..i64::from(limit)).contains(&obs.rotation) {
                return Err(ValidationError::InvalidObservation {
                    index,
                    rotation: obs.rotation,
                    limit,
                    mode,
                });
            }
            let code = RotationCode::new(obs.rotation as u8);
            let incoming = CheckedObservation {
                offset: obs.offset,
                expected: code.project(obs.side_only),
                side_only: obs.side_only,
            };

            let Some(&slot) = by_offset.get(&obs.offset) else {
                by_offset.insert(obs.offset, checked.len());
                checked.push(incoming);
                continue;
            };
            let existing = checked[slot];
            let consistent = match (existing.side_only, incoming.side_only) {
                (false, false) | (true, true) => existing.expected == incoming.expected,
                (false, true) => existing.expected.side_view() == incoming.expected,
                (true, false) => incoming.expected.side_view() == existing.expected,
            };
            if !consistent {
                return Err(ValidationError::ConflictingObservation { offset: obs.offset });
            }
            if existing.side_only && !incoming.side_only {
                checked[slot] = incoming;
            }
        }

        // Stable: ties keep caller order.
        checked.sort_by_key(|c| c.accepted_codes(mode));

        tracing::debug!(
            %mode,
            supplied = raw.len(),
            kept = checked.len(),
            "normalized observation set"
        );

        Ok(Self { mode, checked })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    /// Always false once normalized.
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckedObservation> {
        self.checked.iter()
    }

    /// Index (in evaluation order) of the first observation `origin` fails.
    #[inline]
    pub fn first_mismatch(&self, origin: BlockPos) -> Option<usize> {
        self.checked
            .iter()
            .position(|c| !c.holds_at(self.mode, origin))
    }

    /// True when every observation holds with `origin` as the observer.
    #[inline]
    pub fn matches_at(&self, origin: BlockPos) -> bool {
        self.checked.iter().all(|c| c.holds_at(self.mode, origin))
    }
}
