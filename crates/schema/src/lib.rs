//! Request/response boundary: one versioned JSON record in, one out.
//!
//! # Invariants
//! - Validation errors become structured output, never a crash.
//! - Only unreadable/unparseable input or unwritable output is fatal.
//! - Every response carries the SHA-256 of the exact request bytes.

mod request;
mod response;
mod store;

pub use request::{
    IntegerField, Limits, ObservationRecord, SCHEMA_VERSION, SearchBounds, SearchRequest,
};
pub use response::{ErrorRecord, ResponseStatus, SearchResponse};
pub use store::{LoadedRequest, SchemaError, parse_request, read_request, write_response};

use texrot_search::CancelToken;

/// Validate and run a loaded request, folding validation failures into the
/// response.
pub fn run_request(loaded: &LoadedRequest, cancel: &CancelToken) -> SearchResponse {
    let request = &loaded.request;
    let response = match request.to_run() {
        Ok(run) => SearchResponse::from_outcome(&request.mode, &run.execute_with(cancel)),
        Err(err) => {
            tracing::warn!(kind = err.kind(), %err, "request rejected");
            SearchResponse::from_validation_error(&request.mode, &err)
        }
    };
    response.with_digest(loaded.digest.clone())
}
