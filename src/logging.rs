//! Diagnostic logging for the binary.
//!
//! Library code only emits `tracing` events; this installs the subscriber.
//! Output goes to stderr so it never mixes with codes or exported backups
//! written to stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter (e.g. `totpvault=debug`).
pub const LOG_ENV: &str = "TOTPVAULT_LOG";

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug";

/// Install the global subscriber.
///
/// `--verbose` wins over `TOTPVAULT_LOG`; an unset or unparseable
/// variable falls back to `warn`.  Calling this twice is a no-op.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
