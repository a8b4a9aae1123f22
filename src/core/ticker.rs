//! Periodic tick source for scheduled expiration
//!
//! A [`Ticker`] is either a real interval or disabled. A disabled ticker's
//! [`Ticker::tick`] never resolves, so it can sit in a `select!` next to the
//! other event sources without ever being chosen.

use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub enum Ticker {
    /// Fires every period, starting one period after creation
    Periodic(Interval),
    /// Never fires
    Disabled,
}

impl Ticker {
    /// Create a ticker for `period`; `None` or a zero period gives a disabled one
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(period: Option<Duration>) -> Self {
        match period {
            Some(period) if !period.is_zero() => {
                let mut interval = time::interval_at(Instant::now() + period, period);
                // A late sweep is as good as an on-time one; don't burst to catch up
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                Ticker::Periodic(interval)
            }
            _ => Ticker::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Ticker::Periodic(_))
    }

    /// Wait for the next tick
    ///
    /// Cancel safe, like [`Interval::tick`].
    pub async fn tick(&mut self) -> Instant {
        match self {
            Ticker::Periodic(interval) => interval.tick().await,
            Ticker::Disabled => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_periodic_ticker_waits_one_period() {
        let period = Duration::from_secs(2);
        let start = Instant::now();
        let mut ticker = Ticker::new(Some(period));
        assert!(ticker.is_enabled());

        ticker.tick().await;
        assert!(start.elapsed() >= period);

        ticker.tick().await;
        assert!(start.elapsed() >= period * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_ticker_never_fires() {
        let mut ticker = Ticker::new(None);
        assert!(!ticker.is_enabled());

        let fired = time::timeout(Duration::from_secs(3600), ticker.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test]
    async fn test_zero_period_is_disabled() {
        assert!(!Ticker::new(Some(Duration::ZERO)).is_enabled());
    }
}
