use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use texrot_common::{BlockPos, sort_canonical};

/// Thread-safe sink for matching origins plus the tested-candidate tally.
///
/// Append-only behind a single mutex; matches are rare relative to tested
/// candidates, so contention stays low.
#[derive(Debug)]
pub struct ResultCollector {
    matches: Mutex<Vec<BlockPos>>,
    cap: Option<usize>,
    overflowed: AtomicBool,
    tested: AtomicU64,
}

/// Everything a collector gathered, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedResults {
    pub matches: Vec<BlockPos>,
    pub tested: u64,
    /// A match was dropped because the cap was reached.
    pub truncated: bool,
}

impl ResultCollector {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            matches: Mutex::new(Vec::new()),
            cap,
            overflowed: AtomicBool::new(false),
            tested: AtomicU64::new(0),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Record a match. Returns false once the cap is exhausted; the match is
    /// dropped and the collector is marked full.
    pub fn collect(&self, pos: BlockPos) -> bool {
        let mut matches = self.matches.lock().unwrap_or_else(PoisonError::into_inner);
        if self.cap.is_some_and(|cap| matches.len() >= cap) {
            self.overflowed.store(true, Ordering::Relaxed);
            return false;
        }
        matches.push(pos);
        true
    }

    pub fn add_tested(&self, count: u64) {
        self.tested.fetch_add(count, Ordering::Relaxed);
    }

    /// True once a match has been dropped for lack of room.
    pub fn is_full(&self) -> bool {
        self.overflowed.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort ascending by (x, y, z) and drop duplicates.
    pub fn finalize(self) -> CollectedResults {
        let mut matches = self
            .matches
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        sort_canonical(&mut matches);
        CollectedResults {
            matches,
            tested: self.tested.into_inner(),
            truncated: self.overflowed.into_inner(),
        }
    }
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_sorts_and_dedups() {
        let sink = ResultCollector::unbounded();
        for p in [
            BlockPos::new(2, 0, 0),
            BlockPos::new(-1, 5, 5),
            BlockPos::new(2, 0, 0),
            BlockPos::new(-1, 5, 4),
        ] {
            assert!(sink.collect(p));
        }
        sink.add_tested(10);
        sink.add_tested(5);

        let out = sink.finalize();
        assert_eq!(
            out.matches,
            vec![
                BlockPos::new(-1, 5, 4),
                BlockPos::new(-1, 5, 5),
                BlockPos::new(2, 0, 0)
            ]
        );
        assert_eq!(out.tested, 15);
        assert!(!out.truncated);
    }

    #[test]
    fn cap_drops_overflow_and_marks_full() {
        let sink = ResultCollector::new(Some(2));
        assert!(sink.collect(BlockPos::new(0, 0, 0)));
        assert!(sink.collect(BlockPos::new(1, 0, 0)));
        assert!(!sink.is_full());
        assert!(!sink.collect(BlockPos::new(2, 0, 0)));
        assert!(sink.is_full());
        let out = sink.finalize();
        assert_eq!(out.matches.len(), 2);
        assert!(out.truncated);
    }

    #[test]
    fn concurrent_collect_keeps_every_match() {
        let sink = ResultCollector::unbounded();
        std::thread::scope(|s| {
            for t in 0..4 {
                let sink = &sink;
                s.spawn(move || {
                    for i in 0..250 {
                        sink.collect(BlockPos::new(t, i, 0));
                    }
                    sink.add_tested(250);
                });
            }
        });
        assert_eq!(sink.len(), 1000);
        let out = sink.finalize();
        assert_eq!(out.matches.len(), 1000);
        assert_eq!(out.tested, 1000);
        assert_eq!(out.matches[0], BlockPos::new(0, 0, 0));
    }
}
