//! Total published by the actor, with the closed flag packed alongside
//!
//! The window total is a sum of positive values and never exceeds
//! `i64::MAX`, so it fits in the low 63 bits of a `u64`. The top bit is the
//! closed flag. Keeping both in one atomic means a publish that loses the
//! race against [`PublishedTotal::close`] is rejected rather than landing
//! after the counter froze.

use std::sync::atomic::{AtomicU64, Ordering};

const CLOSED: u64 = 1 << 63;

#[derive(Debug, Default)]
pub struct PublishedTotal {
    state: AtomicU64,
}

impl PublishedTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published total
    pub fn load(&self) -> i64 {
        (self.state.load(Ordering::Acquire) & !CLOSED) as i64
    }

    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) & CLOSED != 0
    }

    /// Publish `total` unless closed; returns false if the value was rejected
    pub fn publish(&self, total: i64) -> bool {
        debug_assert!(total >= 0, "window totals are never negative");
        let value = total.max(0) as u64;

        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current & CLOSED == 0).then_some(value)
            })
            .is_ok()
    }

    /// Set the closed flag, freezing the total; returns true on the first call
    pub fn close(&self) -> bool {
        self.state.fetch_or(CLOSED, Ordering::AcqRel) & CLOSED == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_load() {
        let published = PublishedTotal::new();
        assert_eq!(published.load(), 0);
        assert!(!published.is_closed());

        assert!(published.publish(42));
        assert_eq!(published.load(), 42);

        assert!(published.publish(i64::MAX));
        assert_eq!(published.load(), i64::MAX);
    }

    #[test]
    fn test_close_freezes_total() {
        let published = PublishedTotal::new();
        published.publish(7);

        assert!(published.close());
        assert!(!published.close());
        assert!(published.is_closed());

        assert!(!published.publish(0));
        assert!(!published.publish(100));
        assert_eq!(published.load(), 7);
    }

    #[test]
    fn test_close_races_publish() {
        use std::sync::Arc;
        use std::thread;

        for _ in 0..200 {
            let published = Arc::new(PublishedTotal::new());
            let writer = {
                let published = Arc::clone(&published);
                thread::spawn(move || {
                    for total in 1..=1000 {
                        published.publish(total);
                    }
                })
            };

            published.close();
            let at_close = published.load();
            writer.join().unwrap();

            // Nothing published after close() returned may show up
            assert_eq!(published.load(), at_close);
        }
    }
}
