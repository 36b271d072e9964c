use serde::{Deserialize, Serialize};
use texrot_common::BlockPos;
use texrot_observe::ValidationError;
use texrot_search::{SearchOutcome, SearchStatus};

use crate::request::SCHEMA_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Complete,
    Cancelled,
    TimedOut,
    Truncated,
    /// The request failed validation; no search ran.
    Invalid,
}

impl From<SearchStatus> for ResponseStatus {
    fn from(status: SearchStatus) -> Self {
        match status {
            SearchStatus::Complete => ResponseStatus::Complete,
            SearchStatus::Cancelled => ResponseStatus::Cancelled,
            SearchStatus::TimedOut => ResponseStatus::TimedOut,
            SearchStatus::Truncated => ResponseStatus::Truncated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: String,
    pub message: String,
}

/// Output record. `candidates` are absolute origins in ascending (x, y, z).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub schema_version: u32,
    pub mode: String,
    pub status: ResponseStatus,
    pub candidates: Vec<BlockPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_digest: Option<String>,
}

impl SearchResponse {
    pub fn from_outcome(mode: &str, outcome: &SearchOutcome) -> Self {
        let found = outcome.matches.len();
        let note = match outcome.status {
            SearchStatus::Complete => match found {
                0 => "No origin reproduces every observation; widen the region or recheck the rotations.".to_string(),
                1 => "Exactly one origin reproduces every observation.".to_string(),
                n => format!("{n} origins reproduce every observation; add observations to narrow them down."),
            },
            SearchStatus::Cancelled => {
                format!("Search cancelled; {found} candidates found before stopping.")
            }
            SearchStatus::TimedOut => {
                format!("Deadline reached; {found} candidates found before stopping.")
            }
            SearchStatus::Truncated => format!(
                "Match cap of {found} reached; narrow the region or add observations."
            ),
        };
        Self {
            schema_version: SCHEMA_VERSION,
            mode: mode.to_string(),
            status: outcome.status.into(),
            candidates: outcome.matches.clone(),
            tested: Some(outcome.stats.tested),
            elapsed_ms: Some(outcome.stats.elapsed.as_millis() as u64),
            note: Some(note),
            error: None,
            request_digest: None,
        }
    }

    pub fn from_validation_error(mode: &str, err: &ValidationError) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            mode: mode.to_string(),
            status: ResponseStatus::Invalid,
            candidates: Vec::new(),
            tested: None,
            elapsed_ms: None,
            note: None,
            error: Some(ErrorRecord {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
            request_digest: None,
        }
    }

    pub fn with_digest(mut self, digest: String) -> Self {
        self.request_digest = Some(digest);
        self
    }
}
