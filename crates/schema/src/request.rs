use std::time::Duration;

use serde::{Deserialize, Serialize};
use texrot_common::BlockPos;
use texrot_model::Mode;
use texrot_observe::{Observation, ObservationSet, Region, ValidationError};
use texrot_search::{SearchConfig, SearchRun};

/// Version of the request and response records.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Input record: what was observed, where to look, and which client to emulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// One of the `Mode` names, e.g. `Vanilla21_1Textures`.
    pub mode: String,
    /// Offsets are relative to the unknown origin.
    #[serde(default)]
    pub observations: Vec<ObservationRecord>,
    pub search: SearchBounds,
    /// Worker threads; `<= 0` or absent means one per core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    pub x: IntegerField,
    pub y: IntegerField,
    pub z: IntegerField,
    pub rotation: IntegerField,
    #[serde(default)]
    pub side_only: bool,
}

/// Numeric observation field. Values that are not `i64` integers (fractions,
/// strings, out-of-range literals) parse as `Other` and fail validation with
/// the observation's index instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerField {
    Int(i64),
    Other(serde_json::Value),
}

impl IntegerField {
    fn to_i64(&self, index: usize, field: &'static str) -> Result<i64, ValidationError> {
        match self {
            IntegerField::Int(v) => Ok(*v),
            IntegerField::Other(value) => Err(ValidationError::NonIntegerObservation {
                index,
                field,
                value: value.to_string(),
            }),
        }
    }
}

impl From<i64> for IntegerField {
    fn from(v: i64) -> Self {
        IntegerField::Int(v)
    }
}

/// Inclusive candidate-origin bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBounds {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub z_min: i64,
    pub z_max: i64,
    /// Legacy placement of the thread count; the top-level field wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_matches: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl ObservationRecord {
    /// The observation this record describes; `index` is its position in the request.
    pub fn to_observation(&self, index: usize) -> Result<Observation, ValidationError> {
        let offset = BlockPos::new(
            self.x.to_i64(index, "x")?,
            self.y.to_i64(index, "y")?,
            self.z.to_i64(index, "z")?,
        );
        let rotation = self.rotation.to_i64(index, "rotation")?;
        Ok(Observation::new(offset, rotation, self.side_only))
    }
}

impl From<Observation> for ObservationRecord {
    fn from(o: Observation) -> Self {
        Self {
            x: o.offset.x.into(),
            y: o.offset.y.into(),
            z: o.offset.z.into(),
            rotation: o.rotation.into(),
            side_only: o.side_only,
        }
    }
}

impl SearchBounds {
    pub fn from_region(region: &Region) -> Self {
        let (min, max) = (region.min(), region.max());
        Self {
            x_min: min.x,
            x_max: max.x,
            y_min: min.y,
            y_max: max.y,
            z_min: min.z,
            z_max: max.z,
            threads: None,
        }
    }

    pub fn to_region(&self) -> Result<Region, ValidationError> {
        Region::from_bounds(
            (self.x_min, self.x_max),
            (self.y_min, self.y_max),
            (self.z_min, self.z_max),
        )
    }
}

impl SearchRequest {
    pub fn new(mode: Mode, observations: Vec<ObservationRecord>, search: SearchBounds) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            mode: mode.name().to_string(),
            observations,
            search,
            threads: None,
            limits: None,
        }
    }

    pub fn mode(&self) -> Result<Mode, ValidationError> {
        Ok(self.mode.parse::<Mode>()?)
    }

    /// Effective thread request, 0 meaning auto.
    pub fn threads(&self) -> i64 {
        self.threads.or(self.search.threads).unwrap_or(0)
    }

    pub fn search_config(&self) -> SearchConfig {
        let limits = self.limits.unwrap_or_default();
        let mut config = SearchConfig::with_threads(self.threads());
        if limits.max_matches.is_some() {
            config.max_matches = limits.max_matches;
        }
        config.deadline = limits.deadline_ms.map(Duration::from_millis);
        config
    }

    /// Validate mode, region and observations, in that order.
    pub fn to_run(&self) -> Result<SearchRun, ValidationError> {
        let mode = self.mode()?;
        let region = self.search.to_region()?;
        let raw = self
            .observations
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_observation(i))
            .collect::<Result<Vec<_>, _>>()?;
        let observations = ObservationSet::normalize(mode, &raw)?;
        Ok(SearchRun::new(observations, region, self.search_config()))
    }
}
