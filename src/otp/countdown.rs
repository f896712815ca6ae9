//! Shared countdown for TOTP windows.
//!
//! A single `Countdown` drives every on-screen code for one period.  Each
//! display holds a `CountdownLease`; the background ticker runs only while
//! at least one lease is alive and publishes the remaining seconds through
//! a `watch` channel, so every lease reads the same value at any instant.
//!
//! ```text
//! attach()  0 -> 1   refresh + spawn ticker
//! attach()  n -> n+1 subscribe only
//! drop      n -> n-1 unsubscribe only
//! drop      1 -> 0   abort ticker
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::generator::DEFAULT_PERIOD;
use crate::errors::{Result, TotpVaultError};

/// Default recomputation interval.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// A code is "expiring soon" at or below this many seconds.
pub const EXPIRING_SOON_SECONDS: u32 = 5;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Seconds left in the current window, in `[1, period]`.
pub fn remaining_seconds_at(now_ms: u64, period: u32) -> u32 {
    let period = u64::from(period.max(1));
    let elapsed = (now_ms / 1000) % period;
    // elapsed < period <= u32::MAX
    (period - elapsed) as u32
}

/// Share of the window still left, as a percentage.
pub fn progress(remaining_seconds: u32, period: u32) -> f64 {
    if period == 0 {
        return 0.0;
    }
    f64::from(remaining_seconds) / f64::from(period) * 100.0
}

/// Whether a code with `remaining_seconds` left should be flagged.
pub fn is_expiring_soon(remaining_seconds: u32) -> bool {
    remaining_seconds <= EXPIRING_SOON_SECONDS
}

/// Value published on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining_seconds: u32,
    /// Time-step counter of the window this tick belongs to.
    pub window: u64,
}

impl Tick {
    pub fn at(now_ms: u64, period: u32) -> Self {
        Self {
            remaining_seconds: remaining_seconds_at(now_ms, period),
            window: now_ms / 1000 / u64::from(period.max(1)),
        }
    }
}

/// Everything a display needs to draw its countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownSnapshot {
    pub remaining_seconds: u32,
    pub progress_percent: f64,
    pub is_expiring_soon: bool,
}

impl CountdownSnapshot {
    pub fn from_remaining(remaining_seconds: u32, period: u32) -> Self {
        Self {
            remaining_seconds,
            progress_percent: progress(remaining_seconds, period),
            is_expiring_soon: is_expiring_soon(remaining_seconds),
        }
    }

    pub fn at(now_ms: u64, period: u32) -> Self {
        Self::from_remaining(remaining_seconds_at(now_ms, period), period)
    }
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// Cloneable handle to one shared countdown.
#[derive(Clone)]
pub struct Countdown {
    inner: Arc<Inner>,
}

struct Inner {
    period: u32,
    tick_interval: Duration,
    clock: Arc<dyn Clock>,
    tx: watch::Sender<Tick>,
    activation: Mutex<Activation>,
}

#[derive(Default)]
struct Activation {
    consumers: usize,
    ticker: Option<JoinHandle<()>>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl Countdown {
    /// A countdown over `period` seconds using the system clock.
    pub fn new(period: u32) -> Self {
        Self::with_clock(period, DEFAULT_TICK_INTERVAL, Arc::new(SystemClock))
    }

    /// A countdown with an explicit tick interval and clock.
    ///
    /// `period` is clamped to at least one second.
    pub fn with_clock(period: u32, tick_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let period = period.max(1);
        let (tx, _rx) = watch::channel(Tick::at(clock.now_ms(), period));
        Self {
            inner: Arc::new(Inner {
                period,
                tick_interval,
                clock,
                tx,
                activation: Mutex::new(Activation::default()),
            }),
        }
    }

    pub fn period(&self) -> u32 {
        self.inner.period
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    /// Register a consumer.  The first lease starts the ticker.
    ///
    /// Starting the ticker needs a Tokio runtime; without one the first
    /// attach fails with `RuntimeUnavailable` and nothing is registered.
    pub fn attach(&self) -> Result<CountdownLease> {
        let mut activation = self.inner.lock();

        if activation.consumers == 0 {
            let handle = Handle::try_current()
                .map_err(|e| TotpVaultError::RuntimeUnavailable(e.to_string()))?;
            self.inner.refresh();
            let weak = Arc::downgrade(&self.inner);
            activation.ticker = Some(handle.spawn(run_ticker(weak, self.inner.tick_interval)));
            debug!(period = self.inner.period, "countdown ticker started");
        }
        activation.consumers += 1;

        Ok(CountdownLease {
            rx: self.inner.tx.subscribe(),
            countdown: self.clone(),
        })
    }

    /// Number of live leases.
    pub fn consumers(&self) -> usize {
        self.inner.lock().consumers
    }

    /// Whether the background ticker is running.
    pub fn is_ticking(&self) -> bool {
        self.inner.lock().ticker.is_some()
    }

    /// The last published tick.
    pub fn current(&self) -> Tick {
        *self.inner.tx.borrow()
    }

    fn detach(&self) {
        let mut activation = self.inner.lock();
        activation.consumers = activation.consumers.saturating_sub(1);

        if activation.consumers == 0 {
            if let Some(ticker) = activation.ticker.take() {
                ticker.abort();
                debug!(period = self.inner.period, "countdown ticker stopped");
            }
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Activation> {
        self.activation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Recompute from the clock; publish only when the value moved.
    fn refresh(&self) {
        let tick = Tick::at(self.clock.now_ms(), self.period);
        self.tx.send_if_modified(|current| {
            if *current == tick {
                false
            } else {
                *current = tick;
                true
            }
        });
    }
}

async fn run_ticker(inner: Weak<Inner>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        match inner.upgrade() {
            Some(inner) => inner.refresh(),
            None => break,
        }
    }
}

// ---------------------------------------------------------------------------
// Lease
// ---------------------------------------------------------------------------

/// A registered consumer of a `Countdown`.  Dropping it detaches.
pub struct CountdownLease {
    countdown: Countdown,
    rx: watch::Receiver<Tick>,
}

impl CountdownLease {
    pub fn period(&self) -> u32 {
        self.countdown.period()
    }

    pub fn now_ms(&self) -> u64 {
        self.countdown.now_ms()
    }

    /// The latest published tick.
    pub fn tick(&self) -> Tick {
        *self.rx.borrow()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.rx.borrow().remaining_seconds
    }

    pub fn progress(&self) -> f64 {
        progress(self.remaining_seconds(), self.period())
    }

    pub fn is_expiring_soon(&self) -> bool {
        is_expiring_soon(self.remaining_seconds())
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot::from_remaining(self.remaining_seconds(), self.period())
    }

    /// Wait for the next published change and return it.
    ///
    /// Returns `None` only if the countdown itself has gone away.
    pub async fn changed(&mut self) -> Option<Tick> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Detach explicitly (same as dropping the lease).
    pub fn detach(self) {}
}

impl Drop for CountdownLease {
    fn drop(&mut self) {
        self.countdown.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_seconds_stays_in_range() {
        assert_eq!(remaining_seconds_at(0, 30), 30);
        assert_eq!(remaining_seconds_at(999, 30), 30);
        assert_eq!(remaining_seconds_at(1_000, 30), 29);
        assert_eq!(remaining_seconds_at(29_999, 30), 1);
        assert_eq!(remaining_seconds_at(30_000, 30), 30);
        // 2000-01-01T00:00:10Z, ten seconds into the window.
        assert_eq!(remaining_seconds_at(946_684_810_000, 30), 20);
    }

    #[test]
    fn progress_is_a_percentage() {
        assert_eq!(progress(15, 30), 50.0);
        assert_eq!(progress(30, 30), 100.0);
        assert_eq!(progress(0, 30), 0.0);
    }

    #[test]
    fn expiring_soon_threshold() {
        assert!(is_expiring_soon(5));
        assert!(is_expiring_soon(1));
        assert!(!is_expiring_soon(6));
    }

    #[test]
    fn snapshot_combines_signals() {
        // 27 seconds into the window: 3 left.
        let snap = CountdownSnapshot::at(946_684_827_000, 30);
        assert_eq!(snap.remaining_seconds, 3);
        assert!((snap.progress_percent - 10.0).abs() < 1e-9);
        assert!(snap.is_expiring_soon);
    }

    #[test]
    fn attach_without_runtime_is_an_error() {
        let countdown = Countdown::new(30);
        let result = countdown.attach();

        assert!(matches!(result, Err(TotpVaultError::RuntimeUnavailable(_))));
        assert_eq!(countdown.consumers(), 0);
        assert!(!countdown.is_ticking());
    }

    #[test]
    fn tick_tracks_window() {
        assert_eq!(Tick::at(29_999, 30).window, 0);
        assert_eq!(Tick::at(30_000, 30).window, 1);
    }
}
