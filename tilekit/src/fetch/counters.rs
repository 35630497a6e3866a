//! Fetch progress counters.

use std::fmt;

use parking_lot::Mutex;

/// Final classification of one attempted tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOutcome {
    /// Fetched and persisted. A 2xx body that cannot be decoded or written
    /// counts as [`TileOutcome::Failed`].
    Found,
    /// 404; placeholder written in its place.
    NotFound,
    /// 403; nothing written.
    Blocked,
    /// Transport error, unexpected status, or the tile could not be written.
    Failed,
}

/// Snapshot of a running fetch.
///
/// Every attempted tile lands in exactly one of the outcome counters, so
/// `found + not_found + blocked + failed == attempted` holds for every
/// snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchProgress {
    pub attempted: usize,
    pub found: usize,
    pub not_found: usize,
    pub blocked: usize,
    pub failed: usize,
    /// Tiles that needed fetching when the run started.
    pub total: usize,
}

impl FetchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.attempted >= self.total
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.attempted)
    }

    fn record(&mut self, outcome: TileOutcome) {
        match outcome {
            TileOutcome::Found => self.found += 1,
            TileOutcome::NotFound => self.not_found += 1,
            TileOutcome::Blocked => self.blocked += 1,
            TileOutcome::Failed => self.failed += 1,
        }
        self.attempted += 1;
    }
}

impl fmt::Display for FetchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Attempted: {}/{}   Found: {}   Not found: {}   Blocked: {}   Failed: {}",
            self.attempted, self.total, self.found, self.not_found, self.blocked, self.failed
        )
    }
}

/// Counters shared by the in-flight fetches.
#[derive(Debug)]
pub(crate) struct FetchCounters {
    inner: Mutex<FetchProgress>,
}

impl FetchCounters {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            inner: Mutex::new(FetchProgress::new(total)),
        }
    }

    /// Counts one attempt and returns the snapshot taken under the same lock.
    pub(crate) fn record(&self, outcome: TileOutcome) -> FetchProgress {
        let mut counts = self.inner.lock();
        counts.record(outcome);
        *counts
    }

    pub(crate) fn snapshot(&self) -> FetchProgress {
        *self.inner.lock()
    }
}
