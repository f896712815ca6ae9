//! TOTP code generation (RFC 6238 on top of RFC 4226 HOTP, HMAC-SHA1).
//!
//! `generate` never fails: a credential row must always render something,
//! so any error is logged and replaced by a row of dashes.  Use
//! `try_generate` when the error itself matters.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::warn;

use crate::crypto::base32;
use crate::errors::{Result, TotpVaultError};

/// Default number of digits in a code.
pub const DEFAULT_DIGITS: u32 = 6;

/// Default time-step length in seconds.
pub const DEFAULT_PERIOD: u32 = 30;

/// Largest supported code length (the truncated value is 31 bits).
pub const MAX_DIGITS: u32 = 9;

/// Code length and time-step parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotpParams {
    pub digits: u32,
    pub period: u32,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }
}

impl TotpParams {
    /// Reject parameters the algorithm cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DIGITS).contains(&self.digits) {
            return Err(TotpVaultError::InvalidParameter(format!(
                "digits must be between 1 and {MAX_DIGITS} (got {})",
                self.digits
            )));
        }
        if self.period == 0 {
            return Err(TotpVaultError::InvalidParameter(
                "period must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    /// The time-step counter for a timestamp in milliseconds.
    pub fn counter_at(&self, timestamp_ms: u64) -> u64 {
        timestamp_ms / 1000 / u64::from(self.period.max(1))
    }
}

/// The "code unavailable" placeholder: `digits` dashes.
pub fn unavailable(digits: u32) -> String {
    "-".repeat(digits as usize)
}

/// Returns `true` if `code` is the placeholder rather than a real code.
pub fn is_unavailable(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b == b'-')
}

/// Generate a 6-digit, 30-second code for `secret` at `timestamp_ms`.
pub fn generate(secret: &str, timestamp_ms: u64) -> String {
    generate_with(secret, timestamp_ms, &TotpParams::default())
}

/// Generate a code with explicit parameters, falling back to the
/// placeholder on any error.
pub fn generate_with(secret: &str, timestamp_ms: u64, params: &TotpParams) -> String {
    match try_generate(secret, timestamp_ms, params) {
        Ok(code) => code,
        Err(e) => {
            warn!(error = %e, "TOTP generation failed");
            unavailable(params.digits)
        }
    }
}

/// Generate a code, surfacing decoding and parameter errors.
pub fn try_generate(secret: &str, timestamp_ms: u64, params: &TotpParams) -> Result<String> {
    params.validate()?;

    let key = base32::decode(secret)?;
    if key.is_empty() {
        return Err(TotpVaultError::InvalidEncoding(
            "secret decodes to no key material".into(),
        ));
    }

    hotp(&key, params.counter_at(timestamp_ms), params.digits)
}

/// Compute an HOTP code for raw `key` bytes and `counter`.
pub fn hotp(key: &[u8], counter: u64, digits: u32) -> Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key)
        .map_err(|e| TotpVaultError::HmacError(format!("invalid HMAC key: {e}")))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let code = truncate(&digest) % 10u32.pow(digits);
    Ok(format!("{code:0>width$}", width = digits as usize))
}

/// Dynamic truncation (RFC 4226 §5.3): a 31-bit value picked from the
/// digest at an offset given by its last nibble.
fn truncate(digest: &[u8]) -> u32 {
    let offset = usize::from(digest[digest.len() - 1] & 0x0F);
    u32::from_be_bytes([
        digest[offset] & 0x7F,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ])
}

/// Group a code for display: `"123456"` becomes `"123 456"`.
///
/// Longer codes split after the first three characters. Codes shorter
/// than six characters and the unavailable placeholder are returned
/// unchanged.
pub fn format_code(code: &str) -> String {
    if code.chars().count() < 6 || is_unavailable(code) {
        return code.to_string();
    }
    let split = code
        .char_indices()
        .nth(3)
        .map_or(code.len(), |(idx, _)| idx);
    format!("{} {}", &code[..split], &code[split..])
}
