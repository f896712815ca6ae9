//! `totpvault list`: show all credentials with their current codes.

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;
use crate::otp::{Clock, SystemClock};
use crate::store::CredentialRepository;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (settings, repo) = open_store(cli)?;
    let credentials = repo.list()?;

    output::info(&format!(
        "{} credential(s) in {}",
        credentials.len(),
        repo.path().display()
    ));

    output::print_credentials_table(&credentials, &settings.totp_params(), SystemClock.now_ms());

    Ok(())
}
