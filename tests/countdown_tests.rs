//! Integration tests for the shared countdown and live codes.
//!
//! Tokio time is paused so interval ticks advance instantly; wall-clock
//! time comes from a manual clock the tests move by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use totpvault::otp::{generate, Clock, Countdown, LiveCode};

const SECRET: &str = "JBSWY3DPEHPK3PXP";
const INTERVAL: Duration = Duration::from_millis(100);

struct ManualClock(AtomicU64);

impl ManualClock {
    fn at(ms: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(ms)))
    }

    fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Let the ticker run a couple of intervals.
async fn settle() {
    tokio::time::sleep(INTERVAL * 3).await;
}

#[tokio::test(start_paused = true)]
async fn all_leases_observe_the_same_value() {
    let clock = ManualClock::at(10_000);
    let countdown = Countdown::with_clock(30, INTERVAL, clock.clone());

    let a = countdown.attach().unwrap();
    let b = countdown.attach().unwrap();
    assert_eq!(a.remaining_seconds(), 20);
    assert_eq!(b.remaining_seconds(), 20);

    clock.set(15_000);
    settle().await;

    assert_eq!(a.remaining_seconds(), 15);
    assert_eq!(b.remaining_seconds(), 15);
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.snapshot().progress_percent, 50.0);
    assert!(!a.is_expiring_soon());
}

#[tokio::test(start_paused = true)]
async fn ticker_runs_only_while_leased() {
    let clock = ManualClock::at(0);
    let countdown = Countdown::with_clock(30, INTERVAL, clock.clone());
    assert!(!countdown.is_ticking());
    assert_eq!(countdown.consumers(), 0);

    let first = countdown.attach().unwrap();
    let second = countdown.attach().unwrap();
    assert!(countdown.is_ticking());
    assert_eq!(countdown.consumers(), 2);

    drop(first);
    assert!(countdown.is_ticking());
    assert_eq!(countdown.consumers(), 1);

    second.detach();
    assert!(!countdown.is_ticking());
    assert_eq!(countdown.consumers(), 0);

    // While idle nothing is published.
    clock.set(7_000);
    settle().await;
    assert_eq!(countdown.current().remaining_seconds, 30);

    // Re-attaching refreshes immediately and restarts the ticker.
    let lease = countdown.attach().unwrap();
    assert!(countdown.is_ticking());
    assert_eq!(lease.remaining_seconds(), 23);
}

#[tokio::test(start_paused = true)]
async fn changed_reports_the_next_published_tick() {
    let clock = ManualClock::at(1_000);
    let countdown = Countdown::with_clock(30, INTERVAL, clock.clone());
    let mut lease = countdown.attach().unwrap();

    clock.set(26_000);
    let tick = lease.changed().await.unwrap();

    assert_eq!(tick.remaining_seconds, 4);
    assert_eq!(tick.window, 0);
    assert!(lease.is_expiring_soon());
}

#[tokio::test(start_paused = true)]
async fn window_rollover_resets_remaining_to_period() {
    let clock = ManualClock::at(29_500);
    let countdown = Countdown::with_clock(30, INTERVAL, clock.clone());
    let lease = countdown.attach().unwrap();
    assert_eq!(lease.remaining_seconds(), 1);

    clock.set(30_000);
    settle().await;

    assert_eq!(lease.remaining_seconds(), 30);
    assert_eq!(lease.tick().window, 1);
}

#[tokio::test(start_paused = true)]
async fn live_code_regenerates_once_per_window() {
    let clock = ManualClock::at(25_000);
    let countdown = Countdown::with_clock(30, INTERVAL, clock.clone());

    let mut live = LiveCode::new(SECRET, 6, countdown.attach().unwrap());
    assert_eq!(live.code(), generate(SECRET, 0));
    assert_eq!(live.window(), 0);
    assert!(live.snapshot().is_expiring_soon);

    // A tick inside the same window is consumed without a new code.
    clock.set(27_000);
    let same_window = tokio::time::timeout(Duration::from_secs(1), live.next()).await;
    assert!(same_window.is_err());
    assert_eq!(live.window(), 0);

    clock.set(31_000);
    let next = live.next().await.map(str::to_string);

    assert_eq!(next.as_deref(), Some(generate(SECRET, 30_000).as_str()));
    assert_eq!(live.window(), 1);
    assert_eq!(live.lease().remaining_seconds(), 29);
}

#[tokio::test(start_paused = true)]
async fn dropping_live_codes_releases_the_countdown() {
    let clock = ManualClock::at(0);
    let countdown = Countdown::with_clock(30, INTERVAL, clock.clone());

    let codes: Vec<LiveCode> = (0..3)
        .map(|_| LiveCode::new(SECRET, 6, countdown.attach().unwrap()))
        .collect();
    assert_eq!(countdown.consumers(), 3);

    drop(codes);
    assert_eq!(countdown.consumers(), 0);
    assert!(!countdown.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn countdowns_with_different_periods_are_independent() {
    let clock = ManualClock::at(45_000);
    let thirty = Countdown::with_clock(30, INTERVAL, clock.clone());
    let sixty = Countdown::with_clock(60, INTERVAL, clock.clone());

    let a = thirty.attach().unwrap();
    let b = sixty.attach().unwrap();

    assert_eq!(a.remaining_seconds(), 15);
    assert_eq!(b.remaining_seconds(), 15);
    assert_eq!(a.tick().window, 1);
    assert_eq!(b.tick().window, 0);

    drop(a);
    assert!(!thirty.is_ticking());
    assert!(sixty.is_ticking());
}
