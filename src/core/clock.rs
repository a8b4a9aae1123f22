//! Monotonic time source injected into the counter
//!
//! Timestamps and cutoffs are read through [`Clock`] so tests can drive
//! them. [`SystemClock`] reads [`tokio::time::Instant`], which also follows
//! a paused Tokio test clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// A monotonic clock
pub trait Clock: Send + Sync + 'static {
    /// Current instant; must never go backwards
    fn now(&self) -> Instant;
}

/// The runtime's monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same offset, so a test can keep one clone and hand the
/// other to a counter.
///
/// # Example
///
/// ```
/// use slippy::core::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let before = clock.now();
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.now() - before, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock frozen at `base`
    pub fn starting_at(base: Instant) -> Self {
        ManualClock {
            base,
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        // The closure always returns Some, so this cannot fail
        let _ = self
            .offset_nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_add(nanos))
            });
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::Acquire))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_frozen() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(1500));
        clock.advance(Duration::from_millis(500));

        assert_eq!(clock.elapsed(), Duration::from_secs(2));
        assert_eq!(handle.now(), clock.now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_follows_paused_time() {
        let clock = SystemClock;
        let start = clock.now();

        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(clock.now() - start >= Duration::from_secs(30));
    }
}
