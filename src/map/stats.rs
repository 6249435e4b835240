//! Map Statistics Module
//!
//! Tracks read outcomes and evictions for a timed map.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Map Stats ==
/// Point-in-time snapshot of a map's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapStats {
    /// Number of reads that returned a live value
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries evicted lazily by a read
    pub expired: u64,
    /// Number of entries evicted by sweep passes
    pub swept: u64,
    /// Number of completed sweep passes
    pub sweeps: u64,
    /// Entries physically stored when the snapshot was taken
    pub total_entries: usize,
}

impl MapStats {
    // == Hit Rate ==
    /// Calculates the read hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by accessors and the sweeper.
///
/// Reads only hold the shared lock, so counters cannot live behind it.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    swept: AtomicU64,
    sweeps: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one finished sweep pass that removed `removed` entries.
    pub(crate) fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.swept.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, total_entries: usize) -> MapStats {
        MapStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
