use crate::core::{
    Clock, CounterStats, PublishedTotal, Recorded, StatsSnapshot, SystemClock, Ticker, Window,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::time::Instant;

const DEFAULT_HANDOFF_CAPACITY: usize = 1;

/// Message types for the counter actor
enum CounterMessage {
    Add {
        value: i64,
        done_tx: oneshot::Sender<()>,
    },
    Slip {
        age: Duration,
        done_tx: oneshot::Sender<()>,
    },
}

/// State visible outside the actor
struct Shared {
    /// Last total published by the actor, plus the one-shot closed flag
    published: PublishedTotal,
    shutdown: Notify,
    stats: CounterStats,
    window: Option<Duration>,
}

/// Handle to a slippy counter
///
/// A time-windowed additive counter: [`count`](SlippyCounter::count) is the
/// sum of the values added during roughly the last `window`. All mutation
/// happens on a dedicated actor task; the handle only hands values over and
/// reads the published total.
///
/// Handles are cheap to clone and all clones talk to the same counter. The
/// actor exits on [`close`](SlippyCounter::close), or once every handle has
/// been dropped.
///
/// # Example
///
/// ```
/// use slippy::SlippyCounter;
/// use std::time::Duration;
///
/// # async fn demo() {
/// let counter = SlippyCounter::new(Duration::from_secs(30));
///
/// counter.add(1).await;
/// counter.add(3).await;
/// assert_eq!(counter.count(), 4);
///
/// // Freeze the counter; the total no longer changes
/// counter.close();
/// counter.add(5).await;
/// assert_eq!(counter.count(), 4);
/// # }
/// ```
#[derive(Clone)]
pub struct SlippyCounter {
    tx: mpsc::Sender<CounterMessage>,
    shared: Arc<Shared>,
}

impl SlippyCounter {
    /// Spawn a counter with the given window on the system clock
    ///
    /// A zero window disables scheduled expiration. Must be called from
    /// within a Tokio runtime.
    pub fn new(window: Duration) -> Self {
        Self::builder().window(window).spawn()
    }

    /// Create a builder for configuring a counter
    pub fn builder() -> SlippyCounterBuilder {
        SlippyCounterBuilder::default()
    }

    /// Add `value` to the counter
    ///
    /// Returns without doing anything if the counter is closed. Otherwise
    /// waits until the actor has taken the value, so a following
    /// [`count`](SlippyCounter::count) on the same task already includes it.
    /// Values `<= 0` are silently discarded by the actor.
    pub async fn add(&self, value: i64) {
        if self.is_closed() {
            return;
        }
        self.request(|done_tx| CounterMessage::Add { value, done_tx })
            .await;
    }

    /// Expire every contribution older than `age` right now
    ///
    /// This is the only way contributions leave a counter whose window is
    /// disabled. Does nothing once the counter is closed.
    pub async fn slip(&self, age: Duration) {
        if self.is_closed() {
            return;
        }
        self.request(|done_tx| CounterMessage::Slip { age, done_tx })
            .await;
    }

    /// Last known total
    ///
    /// Never blocks. After [`close`](SlippyCounter::close) this keeps
    /// returning the total as it was at close time, which need not be zero.
    pub fn count(&self) -> i64 {
        self.shared.published.load()
    }

    /// Stop the counter, freezing its total
    ///
    /// Later adds are ignored and no more expiration happens. Idempotent,
    /// and does not wait for the actor to exit.
    pub fn close(&self) {
        if self.shared.published.close() {
            self.shared.shutdown.notify_one();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.published.is_closed()
    }

    /// The lookback window, or `None` if scheduled expiration is disabled
    pub fn window(&self) -> Option<Duration> {
        self.shared.window
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    async fn request(&self, message: impl FnOnce(oneshot::Sender<()>) -> CounterMessage) {
        let (done_tx, done_rx) = oneshot::channel();

        if self.tx.send(message(done_tx)).await.is_err() {
            // Actor has shut down
            return;
        }

        // The actor may exit without ever reaching the message. It is then
        // only freed once every sender is gone, and this task holds one.
        tokio::select! {
            _ = done_rx => {}
            _ = self.tx.closed() => {}
        }
    }
}

/// Builder for configuring a [`SlippyCounter`]
///
/// # Example
///
/// ```
/// use slippy::SlippyCounter;
/// use slippy::core::ManualClock;
/// use std::time::Duration;
///
/// # async fn demo() {
/// let clock = ManualClock::new();
/// let counter = SlippyCounter::builder()
///     .window(Duration::from_secs(60))
///     .clock(clock.clone())
///     .handoff_capacity(16)
///     .spawn();
/// # }
/// ```
pub struct SlippyCounterBuilder {
    window: Duration,
    clock: Arc<dyn Clock>,
    handoff_capacity: usize,
}

impl Default for SlippyCounterBuilder {
    fn default() -> Self {
        Self {
            window: Duration::ZERO,
            clock: Arc::new(SystemClock),
            handoff_capacity: DEFAULT_HANDOFF_CAPACITY,
        }
    }
}

impl SlippyCounterBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lookback window
    ///
    /// This is also the period of the expiration tick. Zero (the default)
    /// disables scheduled expiration.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the clock used to timestamp contributions and compute cutoffs
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Set how many adds may queue for the actor before callers wait
    ///
    /// Every add still waits for the actor to take its value, so this only
    /// bounds the backlog of concurrent producers. Values below 1 are
    /// treated as 1.
    pub fn handoff_capacity(mut self, capacity: usize) -> Self {
        self.handoff_capacity = capacity;
        self
    }

    /// Spawn the actor and return a handle to it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> SlippyCounter {
        let (tx, rx) = mpsc::channel(self.handoff_capacity.max(1));
        let window = Window::new(self.window);

        let shared = Arc::new(Shared {
            published: PublishedTotal::new(),
            shutdown: Notify::new(),
            stats: CounterStats::new(),
            window: window.length(),
        });

        let actor = CounterActor {
            window,
            clock: self.clock,
            rx,
            shared: Arc::clone(&shared),
        };
        tokio::spawn(actor.run());

        SlippyCounter { tx, shared }
    }
}

/// The actor that exclusively owns a counter's window
struct CounterActor {
    window: Window,
    clock: Arc<dyn Clock>,
    rx: mpsc::Receiver<CounterMessage>,
    shared: Arc<Shared>,
}

impl CounterActor {
    /// Main actor loop
    async fn run(mut self) {
        let mut ticker = Ticker::new(self.window.length());
        tracing::debug!(
            window = ?self.window.length(),
            "Slippy counter actor started"
        );

        loop {
            tokio::select! {
                biased;

                _ = self.shared.shutdown.notified() => break,
                msg = self.rx.recv() => match msg {
                    Some(msg) => self.handle_message(msg),
                    None => {
                        tracing::debug!("All counter handles dropped");
                        break;
                    }
                },
                _ = ticker.tick() => self.handle_tick(),
            }
        }

        tracing::debug!(
            total = self.window.total(),
            live = self.window.len(),
            "Slippy counter actor shutting down"
        );
    }

    fn handle_message(&mut self, msg: CounterMessage) {
        // Closed while the message was queued; dropping it releases the caller
        if self.shared.published.is_closed() {
            return;
        }

        match msg {
            CounterMessage::Add { value, done_tx } => {
                self.handle_add(value);
                // Ignore send errors - the caller may have been cancelled
                let _ = done_tx.send(());
            }
            CounterMessage::Slip { age, done_tx } => {
                self.slip_older_than(age);
                let _ = done_tx.send(());
            }
        }
    }

    fn handle_add(&mut self, value: i64) {
        match self.window.record(value, self.clock.now()) {
            Recorded::Accepted => {
                self.shared.stats.record_accepted();
                self.publish();
            }
            Recorded::Ignored => self.shared.stats.record_ignored(),
        }
    }

    fn handle_tick(&mut self) {
        // Idle counter, nothing to scan
        if self.window.is_empty() || self.shared.published.is_closed() {
            return;
        }
        let cutoff = self.window.cutoff(self.clock.now());
        self.slip_to(cutoff);
    }

    fn slip_older_than(&mut self, age: Duration) {
        let cutoff = self.clock.now().checked_sub(age);
        self.slip_to(cutoff);
    }

    /// Run a slip pass; `None` is a cutoff before the clock's origin, which
    /// expires nothing
    fn slip_to(&mut self, cutoff: Option<Instant>) {
        let outcome = match cutoff {
            Some(cutoff) => self.window.slip(cutoff),
            None => Default::default(),
        };
        self.shared.stats.record_slip(outcome);

        if !outcome.is_empty() {
            tracing::trace!(
                removed_entries = outcome.removed_entries,
                removed_total = outcome.removed_total,
                total = self.window.total(),
                "Slipped expired contributions"
            );
            self.publish();
        }
    }

    fn publish(&self) {
        if self.shared.published.publish(self.window.total()) {
            self.shared.stats.set_live(self.window.len());
        }
    }
}
