use std::time::{Duration, Instant};

use texrot_common::BlockPos;
use texrot_model::Mode;
use texrot_observe::{ObservationSet, Region};

use crate::cancel::CancelToken;
use crate::collector::ResultCollector;
use crate::config::SearchConfig;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// Every candidate in the region was evaluated.
    Complete,
    /// The caller's cancel token fired.
    Cancelled,
    /// The configured deadline passed.
    TimedOut,
    /// The match cap was reached and at least one match was dropped.
    Truncated,
}

impl SearchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStatus::Complete => "complete",
            SearchStatus::Cancelled => "cancelled",
            SearchStatus::TimedOut => "timedOut",
            SearchStatus::Truncated => "truncated",
        }
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters from a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates evaluated across all workers.
    pub tested: u64,
    pub workers: usize,
    pub elapsed: Duration,
}

/// Result of a run: canonical-order matches plus how the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub mode: Mode,
    pub matches: Vec<BlockPos>,
    pub status: SearchStatus,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }
}

/// One self-contained search invocation.
#[derive(Debug, Clone)]
pub struct SearchRun {
    observations: ObservationSet,
    region: Region,
    config: SearchConfig,
}

impl SearchRun {
    pub fn new(observations: ObservationSet, region: Region, config: SearchConfig) -> Self {
        Self {
            observations,
            region,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.observations.mode()
    }

    pub fn observations(&self) -> &ObservationSet {
        &self.observations
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run to completion (or until the deadline / match cap).
    pub fn execute(&self) -> SearchOutcome {
        self.execute_with(&CancelToken::new())
    }

    /// Run with a caller-held cancel token.
    ///
    /// The region is cut into one slab per worker along its longest axis;
    /// workers scan x, then y, then z ascending and push matches into a
    /// shared collector. All workers are joined before the result is sorted.
    pub fn execute_with(&self, cancel: &CancelToken) -> SearchOutcome {
        let start = Instant::now();
        let workers = self.config.worker_count(&self.region);
        let _span = tracing::info_span!(
            "search",
            mode = %self.mode(),
            region = %self.region,
            workers
        )
        .entered();

        let slabs = self.region.split(workers);
        let sink = ResultCollector::new(self.config.max_matches);
        let guard = StopGuard {
            cancel,
            deadline: self.config.deadline.and_then(|d| start.checked_add(d)),
            interval: self.config.check_interval.max(1),
        };

        let reports: Vec<WorkerReport> = if slabs.len() == 1 {
            vec![scan_slab(0, &slabs[0], &self.observations, &sink, &guard)]
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = slabs
                    .iter()
                    .enumerate()
                    .map(|(index, slab)| {
                        let (observations, sink, guard) = (&self.observations, &sink, &guard);
                        let spawned = std::thread::Builder::new()
                            .name(format!("texrot-worker-{index}"))
                            .spawn_scoped(scope, move || {
                                scan_slab(index, slab, observations, sink, guard)
                            });
                        match spawned {
                            Ok(handle) => Worker::Spawned(handle),
                            Err(err) => {
                                tracing::warn!(index, %err, "spawn failed, scanning slab inline");
                                Worker::Inline(index, slab)
                            }
                        }
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|worker| match worker {
                        Worker::Spawned(handle) => handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
                        Worker::Inline(index, slab) => {
                            scan_slab(index, slab, &self.observations, &sink, &guard)
                        }
                    })
                    .collect()
            })
        };

        let collected = sink.finalize();
        let status = if collected.truncated {
            SearchStatus::Truncated
        } else if reports.iter().any(|r| r.stopped == Some(SearchStatus::Cancelled)) {
            SearchStatus::Cancelled
        } else if reports.iter().any(|r| r.stopped == Some(SearchStatus::TimedOut)) {
            SearchStatus::TimedOut
        } else {
            SearchStatus::Complete
        };

        let tested: u64 = reports.iter().map(|r| r.tested).sum();
        debug_assert_eq!(tested, collected.tested);
        let stats = SearchStats {
            tested,
            workers: slabs.len(),
            elapsed: start.elapsed(),
        };

        tracing::info!(
            %status,
            matches = collected.matches.len(),
            tested = stats.tested,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search finished"
        );

        SearchOutcome {
            mode: self.mode(),
            matches: collected.matches,
            status,
            stats,
        }
    }
}

/// Search `region` with default limits and the given thread request.
pub fn search(observations: &ObservationSet, region: &Region, threads: i64) -> SearchOutcome {
    SearchRun::new(observations.clone(), *region, SearchConfig::with_threads(threads)).execute()
}

enum Worker<'scope, 'env> {
    Spawned(std::thread::ScopedJoinHandle<'scope, WorkerReport>),
    Inline(usize, &'env Region),
}

/// Stop signals shared read-only by every worker.
struct StopGuard<'a> {
    cancel: &'a CancelToken,
    deadline: Option<Instant>,
    interval: u64,
}

impl StopGuard<'_> {
    fn poll(&self, sink: &ResultCollector) -> Option<SearchStatus> {
        if sink.is_full() {
            Some(SearchStatus::Truncated)
        } else if self.cancel.is_cancelled() {
            Some(SearchStatus::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(SearchStatus::TimedOut)
        } else {
            None
        }
    }
}

struct WorkerReport {
    tested: u64,
    stopped: Option<SearchStatus>,
}

/// Scan one slab in x, y, z order, rejecting each candidate at its first
/// failing observation.
fn scan_slab(
    index: usize,
    slab: &Region,
    observations: &ObservationSet,
    sink: &ResultCollector,
    guard: &StopGuard<'_>,
) -> WorkerReport {
    let (min, max) = (slab.min(), slab.max());
    let mut tested: u64 = 0;
    let mut until_poll: u64 = 0;
    let mut stopped = None;

    'scan: for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                if until_poll == 0 {
                    stopped = guard.poll(sink);
                    if stopped.is_some() {
                        break 'scan;
                    }
                    until_poll = guard.interval;
                }
                until_poll -= 1;
                tested += 1;

                let origin = BlockPos::new(x, y, z);
                if observations.matches_at(origin) && !sink.collect(origin) {
                    stopped = Some(SearchStatus::Truncated);
                    break 'scan;
                }
            }
        }
    }

    sink.add_tested(tested);
    tracing::debug!(worker = index, slab = %slab, tested, stopped = ?stopped, "worker done");
    WorkerReport { tested, stopped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texrot_observe::Observation;

    fn observations() -> ObservationSet {
        ObservationSet::normalize(
            Mode::Vanilla,
            &[Observation::top(0, 0, 0, 1), Observation::side(1, 0, 0, 0)],
        )
        .unwrap()
    }

    #[test]
    fn tested_counts_every_candidate() {
        let region = Region::from_bounds((0, 9), (0, 1), (0, 4)).unwrap();
        let outcome = SearchRun::new(observations(), region, SearchConfig::with_threads(3)).execute();
        assert!(outcome.is_complete());
        assert_eq!(outcome.stats.tested, 100);
        assert_eq!(outcome.stats.workers, 3);
    }

    #[test]
    fn matches_really_match() {
        let set = observations();
        let region = Region::from_bounds((-20, 20), (60, 62), (-20, 20)).unwrap();
        let outcome = search(&set, &region, 4);
        assert!(!outcome.matches.is_empty());
        for m in &outcome.matches {
            assert!(set.matches_at(*m));
            assert!(region.contains(*m));
        }
    }

    #[test]
    fn status_names_are_stable() {
        assert_eq!(SearchStatus::Complete.as_str(), "complete");
        assert_eq!(SearchStatus::TimedOut.to_string(), "timedOut");
    }

    #[test]
    fn report_counts_partial_scan() {
        let token = CancelToken::new();
        token.cancel();
        let guard = StopGuard {
            cancel: &token,
            deadline: None,
            interval: 8,
        };
        let sink = ResultCollector::unbounded();
        let slab = Region::from_bounds((0, 3), (0, 0), (0, 0)).unwrap();
        let report = scan_slab(0, &slab, &observations(), &sink, &guard);
        assert_eq!(report.tested, 0);
        assert_eq!(report.stopped, Some(SearchStatus::Cancelled));
    }
}
