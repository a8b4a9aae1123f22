//! # slippy
//!
//! A time-windowed additive counter for Rust.
//!
//! ## Overview
//!
//! A [`SlippyCounter`] answers "what is the sum of everything added in the
//! last W?" without callers tracking timestamps or pruning anything
//! themselves. Additions age out of the total ("slip") once they are older
//! than the window.
//!
//! It is meant for rate and volume observation such as "events in the last
//! 30 seconds", where eventually-consistent freshness is fine:
//! - **Not exact at sub-tick granularity**: expiry runs once per window, so
//!   a contribution may be counted for up to one extra window
//! - **Cheap reads**: [`SlippyCounter::count`] is a single atomic load
//! - **No lost updates**: all mutation is serialized through one actor task
//!
//! ## Quick Start
//!
//! ```
//! use slippy::SlippyCounter;
//! use std::time::Duration;
//!
//! # async fn demo() {
//! // Count everything added in the last 30 seconds
//! let counter = SlippyCounter::new(Duration::from_secs(30));
//!
//! counter.add(1).await;
//! counter.add(3).await;
//! println!("Last 30s: {}", counter.count());
//!
//! // Non-positive values are ignored
//! counter.add(-1).await;
//! assert_eq!(counter.count(), 4);
//!
//! // Freeze the counter; count() keeps returning 4 from now on
//! counter.close();
//! # }
//! ```
//!
//! ## Disabled Window
//!
//! A zero window turns scheduled expiration off. Contributions then stay
//! until the counter is closed or the caller expires them explicitly:
//!
//! ```
//! use slippy::SlippyCounter;
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let counter = SlippyCounter::new(Duration::ZERO);
//! counter.add(5).await;
//! counter.add(3).await;
//! assert_eq!(counter.count(), 8);
//!
//! // Drop anything older than a minute
//! counter.slip(Duration::from_secs(60)).await;
//! # }
//! ```
//!
//! ## Testing With A Manual Clock
//!
//! Timestamps come from an injected [`Clock`]. [`ManualClock`] only moves
//! when advanced, which makes expiration deterministic:
//!
//! ```
//! use slippy::{ManualClock, SlippyCounter};
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let clock = ManualClock::new();
//! let counter = SlippyCounter::builder().clock(clock.clone()).spawn();
//!
//! counter.add(10).await;
//! clock.advance(Duration::from_secs(90));
//! counter.slip(Duration::from_secs(60)).await;
//! assert_eq!(counter.count(), 0);
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  ┌──────────┐  ┌──────────┐
//! │ add(v)   │  │ slip(age)│  │ close()  │
//! └────┬─────┘  └────┬─────┘  └────┬─────┘
//!      │   channel   │             │ notify
//!      └──────┬──────┘             │
//!       ┌─────▼─────────────────────▼──┐   ┌─────────┐
//!       │          Counter actor       │◄──┤ Ticker  │
//!       │  (owns the Window: total +   │   │(period =│
//!       │   ordered contribution log)  │   │ window) │
//!       └─────────────┬────────────────┘   └─────────┘
//!                     │ publish
//!           ┌─────────▼───────┐
//!           │ PublishedTotal  │◄── count()
//!           │ (total + closed)│◄── close()
//!           └─────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! [`SlippyCounter`] is `Clone + Send + Sync`; every clone talks to the same
//! actor. The underlying [`Window`](crate::core::Window) is a plain single-owner
//! struct and can be used directly where no concurrency is needed.
//!
//! ## Features
//!
//! - `bin`: Build the `slippy` command-line watcher

pub mod actor;
pub mod core;


pub use crate::actor::{SlippyCounter, SlippyCounterBuilder};
pub use crate::core::{Clock, ManualClock, StatsSnapshot, SystemClock};
