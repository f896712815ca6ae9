//! `totpvault export`: write a backup of every credential.
//!
//! Encrypted by default; `--plain` writes the secrets in the clear.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::{rate, BackupCodec, ExportResult};
use crate::cli::output;
use crate::cli::{open_store, prompt_new_password, Cli};
use crate::errors::{Result, TotpVaultError};
use crate::store::CredentialRepository;

/// Execute the `export` command.
pub fn execute(cli: &Cli, plain: bool, output_path: Option<&Path>) -> Result<()> {
    let (settings, repo) = open_store(cli)?;
    let credentials = repo.list()?;

    if credentials.is_empty() {
        output::warning("No credentials to export.");
        return Ok(());
    }

    let codec = BackupCodec::new(settings.backup_prefix.as_str());

    let export = if plain {
        output::warning("Plaintext backups contain every secret unencrypted. Store it carefully.");
        codec.export_plain(&credentials)?
    } else {
        let password = prompt_new_password()?;
        output::info(&format!(
            "Password strength: {}",
            output::strength_label(rate(&password))
        ));
        codec.export_encrypted(&credentials, &password)?
    };

    let destination = match resolve_destination(output_path, &export)? {
        Some(path) => path,
        None => {
            // Write to stdout (no success message, just raw output).
            println!("{}", export.content);
            return Ok(());
        }
    };

    if destination == repo.path() {
        return Err(TotpVaultError::CommandFailed(
            "refusing to export over the credential store".into(),
        ));
    }

    write_backup(&destination, &export.content)?;

    output::success(&format!(
        "Exported {} credential(s) to {}{}",
        credentials.len(),
        destination.display(),
        if plain { " (unencrypted)" } else { "" }
    ));

    Ok(())
}

/// `None` means stdout.
fn resolve_destination(output_path: Option<&Path>, export: &ExportResult) -> Result<Option<PathBuf>> {
    match output_path {
        Some(p) if p == Path::new("-") => Ok(None),
        Some(p) if p.is_dir() => Ok(Some(p.join(&export.filename))),
        Some(p) => Ok(Some(p.to_path_buf())),
        None => Ok(Some(std::env::current_dir()?.join(&export.filename))),
    }
}

fn write_backup(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        TotpVaultError::CommandFailed(format!("failed to write {}: {e}", path.display()))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
