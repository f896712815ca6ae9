//! `totpvault remove`: delete a credential.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{find_credential, open_store, Cli};
use crate::errors::{Result, TotpVaultError};
use crate::store::CredentialRepository;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let (_settings, mut repo) = open_store(cli)?;
    let credential = find_credential(&repo, name)?;

    // Unless --force is set, ask before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove '{}'? You will lose access unless it is backed up.",
                credential.name
            ))
            .default(false)
            .interact()
            .map_err(|e| TotpVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if !repo.delete(&credential.id)? {
        return Err(TotpVaultError::CredentialNotFound(name.to_string()));
    }

    output::success(&format!("Removed '{}'", credential.name));
    Ok(())
}
