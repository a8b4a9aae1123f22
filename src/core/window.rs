//! Contribution log and the slip (expiration) pass
//!
//! A [`Window`] holds the running total together with the ordered log of
//! contributions that produced it. It is not thread-safe; the counter actor
//! owns exactly one and is the only code that touches it.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// A single accepted addition.
///
/// Created when the owner accepts a value and dropped only by [`Window::slip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    value: i64,
    observed_at: Instant,
}

impl Contribution {
    /// The amount added (always positive)
    pub fn value(&self) -> i64 {
        self.value
    }

    /// When the contribution was accepted
    pub fn observed_at(&self) -> Instant {
        self.observed_at
    }
}

/// What [`Window::record`] did with a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The value was appended and added to the total
    Accepted,
    /// The value was discarded (non-positive, or the total would overflow)
    Ignored,
}

/// Result of a single slip pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlipOutcome {
    /// Number of contributions removed from the head of the log
    pub removed_entries: usize,
    /// Sum of the removed contributions, already subtracted from the total
    pub removed_total: i64,
}

impl SlipOutcome {
    /// Returns true if nothing expired
    pub fn is_empty(&self) -> bool {
        self.removed_entries == 0
    }
}

/// Running total plus the contribution log backing it
///
/// The sum of all live contribution values always equals [`Window::total`],
/// and contributions are kept in non-decreasing `observed_at` order, so
/// expired entries always form a contiguous prefix of the log.
///
/// # Example
///
/// ```
/// use slippy::core::Window;
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let start = Instant::now();
/// let mut window = Window::new(Duration::from_secs(30));
///
/// window.record(4, start);
/// window.record(6, start + Duration::from_secs(10));
/// assert_eq!(window.total(), 10);
///
/// // Anything observed before the cutoff is dropped
/// let outcome = window.slip(start + Duration::from_secs(5));
/// assert_eq!(outcome.removed_total, 4);
/// assert_eq!(window.total(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Window {
    total: i64,
    log: VecDeque<Contribution>,
    length: Option<Duration>,
}

impl Window {
    /// Create an empty window
    ///
    /// A zero `length` disables scheduled expiration: [`Window::length`]
    /// returns `None` and contributions only leave the log through an
    /// explicit [`Window::slip`].
    pub fn new(length: Duration) -> Self {
        Window {
            total: 0,
            log: VecDeque::new(),
            length: (!length.is_zero()).then_some(length),
        }
    }

    /// Current running total
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Lookback period, or `None` when scheduled expiration is disabled
    pub fn length(&self) -> Option<Duration> {
        self.length
    }

    /// Number of live contributions
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Live contributions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Contribution> {
        self.log.iter()
    }

    /// The cutoff a scheduled pass at `now` would use
    ///
    /// Returns `None` when expiration is disabled or `now` is too close to
    /// the clock's origin for the subtraction to be representable.
    pub fn cutoff(&self, now: Instant) -> Option<Instant> {
        self.length.and_then(|length| now.checked_sub(length))
    }

    /// Record `value` as observed at `at`
    ///
    /// Non-positive values are ignored. A value that would overflow the
    /// total is ignored as well, which keeps the sum of the log exact.
    pub fn record(&mut self, value: i64, at: Instant) -> Recorded {
        if value <= 0 {
            return Recorded::Ignored;
        }

        let Some(total) = self.total.checked_add(value) else {
            tracing::warn!(
                value,
                total = self.total,
                "Contribution would overflow the window total, ignoring"
            );
            return Recorded::Ignored;
        };

        debug_assert!(
            self.log.back().is_none_or(|last| last.observed_at <= at),
            "contributions must be recorded in time order"
        );

        self.log.push_back(Contribution {
            value,
            observed_at: at,
        });
        self.total = total;
        Recorded::Accepted
    }

    /// Drop every contribution observed strictly before `cutoff`
    ///
    /// The cutoff is fixed for the whole pass. Survivors keep their relative
    /// order and the total is reduced by exactly the sum that was removed.
    /// Calling this on an empty log, or twice with the same cutoff, is a
    /// no-op.
    pub fn slip(&mut self, cutoff: Instant) -> SlipOutcome {
        let mut cut = 0;
        let mut removed = 0i64;

        for entry in &self.log {
            if entry.observed_at >= cutoff {
                break;
            }
            removed += entry.value;
            cut += 1;
        }

        if cut == 0 {
            return SlipOutcome::default();
        }

        self.log.drain(..cut);
        self.total -= removed;

        SlipOutcome {
            removed_entries: cut,
            removed_total: removed,
        }
    }

    #[cfg(test)]
    pub(crate) fn live_sum(&self) -> i64 {
        self.log.iter().map(Contribution::value).sum()
    }
}
