//! Lightweight counter statistics
//!
//! Plain atomics written only by the counter actor and readable from any
//! thread. Relaxed ordering is enough: each value is independent and only
//! ever read for observation.

use super::SlipOutcome;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Statistics published by a counter's actor
#[derive(Debug, Default)]
pub struct CounterStats {
    /// Contributions appended to the log
    accepted: AtomicU64,
    /// Values discarded by the add policy
    ignored: AtomicU64,
    /// Contributions removed by slip passes
    expired: AtomicU64,
    /// Slip passes executed (scheduled or caller-driven)
    slips: AtomicU64,
    /// Contributions currently in the log
    live: AtomicUsize,
}

/// Point-in-time copy of [`CounterStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub ignored: u64,
    pub expired: u64,
    pub slips: u64,
    pub live: usize,
}

impl CounterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_slip(&self, outcome: SlipOutcome) {
        self.slips.fetch_add(1, Ordering::Relaxed);
        self.expired
            .fetch_add(outcome.removed_entries as u64, Ordering::Relaxed);
    }

    pub(crate) fn set_live(&self, live: usize) {
        self.live.store(live, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            slips: self.slips.load(Ordering::Relaxed),
            live: self.live.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_updates() {
        let stats = CounterStats::new();

        stats.record_accepted();
        stats.record_accepted();
        stats.record_ignored();
        stats.record_slip(SlipOutcome {
            removed_entries: 2,
            removed_total: 7,
        });
        stats.record_slip(SlipOutcome::default());
        stats.set_live(0);

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                accepted: 2,
                ignored: 1,
                expired: 2,
                slips: 2,
                live: 0,
            }
        );
    }
}
