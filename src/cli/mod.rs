//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use zeroize::Zeroizing;

use crate::backup::{check_backup_password, ConflictPolicy, MIN_PASSWORD_LEN};
use crate::config::Settings;
use crate::errors::{Result, TotpVaultError};
use crate::store::{Credential, CredentialRepository, FileRepository};

/// Environment variable that supplies the backup password non-interactively.
pub const PASSWORD_ENV: &str = "TOTPVAULT_PASSWORD";

/// totpvault: local TOTP authenticator with encrypted backups.
#[derive(Parser)]
#[command(
    name = "totpvault",
    about = "Local TOTP authenticator with encrypted backups",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Credential store file (default: store_file from .totpvault.toml)
    #[arg(long, global = true, env = "TOTPVAULT_STORE")]
    pub store: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a credential from a name and Base32 secret, or from an otpauth:// URI
    Add {
        /// Display name (e.g. "GitHub - alice")
        #[arg(required_unless_present = "uri")]
        name: Option<String>,

        /// Base32 secret (omit for interactive prompt)
        secret: Option<String>,

        /// otpauth://totp/... provisioning URI
        #[arg(long, conflicts_with_all = ["name", "secret"])]
        uri: Option<String>,
    },

    /// List credentials with their current codes
    List,

    /// Print the current code for one credential
    Code {
        /// Credential name or id
        name: String,

        /// Copy the code to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// Rename a credential
    Rename {
        /// Current name or id
        name: String,
        /// New display name
        new_name: String,
    },

    /// Remove a credential
    Remove {
        /// Credential name or id
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show live codes with a shared countdown (Ctrl-C to quit)
    Watch {
        /// Only show these credentials (default: all)
        names: Vec<String>,
    },

    /// Export all credentials to a backup file
    Export {
        /// Write an unencrypted backup
        #[arg(long)]
        plain: bool,

        /// Output file or directory ("-" for stdout; default: dated file in cwd)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import credentials from a backup file (plain or encrypted)
    Import {
        /// Path to the backup file
        file: PathBuf,

        /// What to do when a name already exists
        #[arg(long, value_enum, default_value_t = ConflictPolicy::Skip)]
        on_conflict: ConflictPolicy,

        /// Show what would be imported without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.totpvault.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the store path: `--store` wins over the config file.
pub fn store_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.store {
        Some(path) => Ok(path.clone()),
        None => Ok(settings.store_path(&std::env::current_dir()?)),
    }
}

/// Load settings and open the credential store.
pub fn open_store(cli: &Cli) -> Result<(Settings, FileRepository)> {
    let settings = load_settings()?;
    let path = store_path(cli, &settings)?;
    let repo = FileRepository::open(&path)?;
    Ok((settings, repo))
}

/// Find a credential by exact name, falling back to its id.
pub fn find_credential<R>(repo: &R, name_or_id: &str) -> Result<Credential>
where
    R: CredentialRepository + ?Sized,
{
    if let Some(credential) = repo.find_by_name(name_or_id)? {
        return Ok(credential);
    }
    repo.get(name_or_id)?
        .ok_or_else(|| TotpVaultError::CredentialNotFound(name_or_id.to_string()))
}

/// Get the password of an existing backup, trying in order:
/// 1. `TOTPVAULT_PASSWORD` env var
/// 2. Interactive prompt
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Backup password")
        .interact()
        .map_err(|e| TotpVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Choose a password for a new encrypted backup.
///
/// `TOTPVAULT_PASSWORD` is used as-is when set (after the length check).
/// Interactively, the password is asked twice; a short one is asked for
/// again, a mismatch is an error.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        check_backup_password(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose backup password")
                .interact()
                .map_err(|e| TotpVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if check_backup_password(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        let confirmation = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Confirm backup password")
                .interact()
                .map_err(|e| TotpVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if *password != *confirmation {
            return Err(TotpVaultError::PasswordMismatch);
        }

        return Ok(password);
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}
