use std::time::Duration;

use texrot_observe::Region;

/// Matches kept in memory before a run stops as truncated.
pub const DEFAULT_MAX_MATCHES: usize = 100_000;

/// Candidates a worker evaluates between polls of the stop signals.
pub const DEFAULT_CHECK_INTERVAL: u64 = 4096;

/// Search tuning: parallelism, memory cap and stop conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Requested workers; zero or negative means one per available core.
    pub threads: i64,
    /// Stop once this many matches are held. `None` keeps everything.
    pub max_matches: Option<usize>,
    /// Candidates between cancellation/deadline polls, per worker.
    pub check_interval: u64,
    /// Wall-clock budget measured from the start of the run.
    pub deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_matches: Some(DEFAULT_MAX_MATCHES),
            check_interval: DEFAULT_CHECK_INTERVAL,
            deadline: None,
        }
    }
}

impl SearchConfig {
    pub fn with_threads(threads: i64) -> Self {
        Self {
            threads,
            ..Self::default()
        }
    }

    /// Workers requested after resolving "auto".
    pub fn resolved_threads(&self) -> usize {
        if self.threads <= 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
        } else {
            usize::try_from(self.threads).unwrap_or(usize::MAX)
        }
    }

    /// Workers actually used for `region`: never more than there are slabs
    /// along its longest axis, never fewer than one.
    pub fn worker_count(&self, region: &Region) -> usize {
        let slabs = region.axis_len(region.longest_axis());
        let slabs = usize::try_from(slabs).unwrap_or(usize::MAX);
        self.resolved_threads().min(slabs).max(1)
    }
}
