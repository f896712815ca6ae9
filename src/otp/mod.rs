//! One-time password generation and timing.
//!
//! This module provides:
//! - RFC 6238 code generation with a placeholder fallback (`generator`)
//! - The shared, lease-counted countdown (`countdown`)
//! - Codes that refresh themselves once per window (`live`)
//! - `otpauth://` provisioning URI parsing (`uri`)

pub mod countdown;
pub mod generator;
pub mod live;
pub mod uri;

pub use countdown::{Clock, Countdown, CountdownLease, CountdownSnapshot, SystemClock, Tick};
pub use generator::{
    format_code, generate, generate_with, hotp, is_unavailable, try_generate, unavailable,
    TotpParams, DEFAULT_DIGITS, DEFAULT_PERIOD, MAX_DIGITS,
};
pub use live::LiveCode;
pub use uri::{parse_uri, ProvisioningUri};
