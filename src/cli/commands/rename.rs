//! `totpvault rename`: change a credential's display name.

use crate::cli::output;
use crate::cli::{find_credential, open_store, Cli};
use crate::errors::{Result, TotpVaultError};
use crate::store::{CredentialRepository, CredentialUpdate};

/// Execute the `rename` command.
pub fn execute(cli: &Cli, name: &str, new_name: &str) -> Result<()> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(TotpVaultError::CommandFailed("new name cannot be empty".into()));
    }

    let (_settings, mut repo) = open_store(cli)?;
    let credential = find_credential(&repo, name)?;

    let updated = repo.update(&credential.id, CredentialUpdate::name(new_name))?;

    output::success(&format!("Renamed '{}' to '{}'", credential.name, updated.name));
    Ok(())
}
