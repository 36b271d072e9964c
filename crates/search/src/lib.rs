//! Candidate search: finds every origin whose predicted rotations reproduce
//! all observations.
//!
//! # Invariants
//! - The set of matches is identical for any worker count.
//! - Output order comes from an explicit sort at finalize, never from
//!   worker completion order.
//! - Workers share only the result collector and the stop signals.
//! - Early stops (cancel, deadline, match cap) still return the matches
//!   collected so far; every one of them is a real match.

mod cancel;
mod collector;
mod config;
mod search;

pub use cancel::CancelToken;
pub use collector::{CollectedResults, ResultCollector};
pub use config::{DEFAULT_CHECK_INTERVAL, DEFAULT_MAX_MATCHES, SearchConfig};
pub use search::{SearchOutcome, SearchRun, SearchStats, SearchStatus, search};
