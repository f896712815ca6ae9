//! `totpvault import`: bring credentials in from a backup file.
//!
//! Plain and encrypted backups are told apart by content, not extension.

use std::fs;
use std::path::Path;

use crate::backup::{apply_import, is_encrypted_file, BackupCodec, ConflictPolicy};
use crate::cli::output;
use crate::cli::{open_store, prompt_password, Cli};
use crate::errors::{Result, TotpVaultError};
use crate::store::CredentialRepository;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &Path, policy: ConflictPolicy, dry_run: bool) -> Result<()> {
    if !file_path.exists() {
        return Err(TotpVaultError::CommandFailed(format!(
            "import file not found: {}",
            file_path.display()
        )));
    }

    let text = fs::read_to_string(file_path)?;

    let (settings, mut repo) = open_store(cli)?;
    let existing = repo.list()?;
    let codec = BackupCodec::new(settings.backup_prefix.as_str());

    let outcome = if is_encrypted_file(&text) {
        let password = prompt_password()?;
        codec.import_encrypted(&text, &password, &existing)?
    } else {
        codec.import_plain(&text, &existing)?
    };

    if outcome.total == 0 {
        output::warning("No credentials found in the backup.");
        return Ok(());
    }

    output::info(&format!(
        "Found {} credential(s) in {}",
        outcome.total,
        file_path.display()
    ));

    if outcome.has_duplicates() {
        output::warning(&format!(
            "{} already exist: {} (on conflict: {policy})",
            outcome.duplicate_names.len(),
            outcome.duplicate_names.join(", ")
        ));
    }

    if dry_run {
        for input in &outcome.credentials {
            let marker = if outcome.duplicate_names.contains(&input.name) { "~" } else { "+" };
            output::info(&format!("  {marker} {}", input.name));
        }
        output::tip("Dry run: nothing was written.");
        return Ok(());
    }

    let report = apply_import(&mut repo, &outcome, policy)?;

    output::success(&format!(
        "Imported {} new, updated {}, skipped {} ({} total)",
        report.created,
        report.updated,
        report.skipped,
        repo.len()
    ));

    Ok(())
}
