//! A TOTP code kept current by a shared countdown.
//!
//! `LiveCode` regenerates once per window: it wakes on every published
//! tick but only recomputes when the tick belongs to a window it has not
//! generated for yet, which is exactly the tick where the remaining
//! seconds jump back to the top of the period.

use super::countdown::{CountdownLease, CountdownSnapshot};
use super::generator::{generate_with, TotpParams};

pub struct LiveCode {
    secret: String,
    params: TotpParams,
    lease: CountdownLease,
    code: String,
    window: u64,
}

impl LiveCode {
    /// Bind `secret` to `lease` and generate the first code immediately.
    ///
    /// The period comes from the lease; `digits` is the code length.
    pub fn new(secret: impl Into<String>, digits: u32, lease: CountdownLease) -> Self {
        let params = TotpParams {
            digits,
            period: lease.period(),
        };
        let tick = lease.tick();
        let mut live = Self {
            secret: secret.into(),
            params,
            lease,
            code: String::new(),
            window: tick.window,
        };
        live.regenerate(tick.window);
        live
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Time-step counter the current code was generated for.
    pub fn window(&self) -> u64 {
        self.window
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        self.lease.snapshot()
    }

    pub fn lease(&self) -> &CountdownLease {
        &self.lease
    }

    /// Wait until the next window starts, regenerate, and return the code.
    ///
    /// Ticks inside the current window are consumed without recomputing.
    /// Returns `None` if the countdown has gone away.
    pub async fn next(&mut self) -> Option<&str> {
        loop {
            let tick = self.lease.changed().await?;
            if tick.window != self.window {
                self.regenerate(tick.window);
                return Some(&self.code);
            }
        }
    }

    /// Generate for the start of `window` so the code always matches the
    /// window the countdown reports, whatever the clock reads right now.
    fn regenerate(&mut self, window: u64) {
        let window_start_ms = window
            .saturating_mul(u64::from(self.params.period))
            .saturating_mul(1000);
        self.code = generate_with(&self.secret, window_start_ms, &self.params);
        self.window = window;
    }
}
