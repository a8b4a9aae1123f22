//! Core components of the slippy counter
//!
//! This module contains the single-threaded building blocks the counter
//! actor is assembled from:
//! - [`window`]: Contributions, the ordered contribution log and the slip pass
//! - [`clock`]: The injected monotonic time source
//! - [`ticker`]: A periodic tick that can be started in "never fires" mode
//! - [`stats`]: Lock-free counters published by the actor
//! - [`published`]: The total readers see, frozen once the counter closes

pub mod clock;
pub mod published;
pub mod stats;
pub mod ticker;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use published::PublishedTotal;
pub use stats::{CounterStats, StatsSnapshot};
pub use ticker::Ticker;
pub use window::{Contribution, Recorded, SlipOutcome, Window};
