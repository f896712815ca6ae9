//! `totpvault code`: print (and optionally copy) one current code.

use crate::cli::output;
use crate::cli::{find_credential, open_store, Cli};
use crate::errors::{Result, TotpVaultError};
use crate::otp::countdown::remaining_seconds_at;
use crate::otp::{try_generate, Clock, SystemClock};

/// Execute the `code` command.
pub fn execute(cli: &Cli, name: &str, copy: bool) -> Result<()> {
    let (settings, repo) = open_store(cli)?;
    let credential = find_credential(&repo, name)?;

    let params = settings.totp_params();
    let now_ms = SystemClock.now_ms();

    // Scripts read stdout, so surface the real error instead of dashes.
    let code = try_generate(&credential.secret, now_ms, &params)?;
    println!("{code}");

    if copy {
        copy_to_clipboard(&code)?;
        output::success(&format!(
            "Copied code for '{}' (valid {}s)",
            credential.name,
            remaining_seconds_at(now_ms, params.period)
        ));
    }

    Ok(())
}

#[cfg(feature = "clipboard")]
fn copy_to_clipboard(code: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| TotpVaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(code.to_string())
        .map_err(|e| TotpVaultError::CommandFailed(format!("clipboard write failed: {e}")))
}

#[cfg(not(feature = "clipboard"))]
fn copy_to_clipboard(_code: &str) -> Result<()> {
    Err(TotpVaultError::CommandFailed(
        "built without clipboard support (enable the `clipboard` feature)".into(),
    ))
}
