//! `totpvault add`: store a new credential.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::config::Settings;
use crate::crypto::base32;
use crate::errors::{Result, TotpVaultError};
use crate::otp::{parse_uri, TotpParams};
use crate::store::{CredentialInput, CredentialRepository};

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: Option<&str>, secret: Option<&str>, uri: Option<&str>) -> Result<()> {
    let (settings, mut repo) = open_store(cli)?;

    let input = match uri {
        Some(uri) => from_uri(uri, &settings.totp_params())?,
        None => {
            let name = name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| TotpVaultError::CommandFailed("a name is required".into()))?;
            CredentialInput::new(name, read_secret(name, secret)?)
        }
    };

    if !base32::is_valid(&input.secret) {
        return Err(TotpVaultError::InvalidEncoding(format!(
            "'{}' is not a Base32 secret",
            input.name
        )));
    }

    if repo.find_by_name(&input.name)?.is_some() {
        output::warning(&format!(
            "A credential named '{}' already exists; adding another.",
            input.name
        ));
    }

    let input = CredentialInput::new(input.name, base32::normalize(&input.secret));
    let credential = repo.create(input)?;

    output::success(&format!(
        "Added '{}' ({} total)",
        credential.name,
        repo.len()
    ));
    output::tip(&format!("Get a code: totpvault code \"{}\"", credential.name));

    Ok(())
}

/// Build the input from a provisioning URI, warning about parameters that
/// differ from the configured ones.
fn from_uri(uri: &str, params: &TotpParams) -> Result<CredentialInput> {
    let parsed = parse_uri(uri)?;

    if parsed
        .algorithm
        .as_deref()
        .is_some_and(|a| !a.eq_ignore_ascii_case("SHA1"))
    {
        output::warning("Only SHA1 is supported; the URI's algorithm is ignored.");
    }
    if parsed.digits.is_some_and(|d| d != params.digits)
        || parsed.period.is_some_and(|p| p != params.period)
    {
        output::warning(&format!(
            "The URI asks for different digits/period; codes use {} digits every {}s (see {}).",
            params.digits,
            params.period,
            Settings::FILE_NAME
        ));
    }

    Ok(CredentialInput::new(parsed.name, parsed.secret))
}

/// The secret from the argument, piped stdin, or a hidden prompt.
fn read_secret(name: &str, secret: Option<&str>) -> Result<String> {
    if let Some(s) = secret {
        output::warning("Secret provided on command line; it may appear in shell history.");
        return Ok(s.to_string());
    }

    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf.trim().to_string());
    }

    dialoguer::Password::new()
        .with_prompt(format!("Base32 secret for {name}"))
        .interact()
        .map_err(|e| TotpVaultError::CommandFailed(format!("input prompt: {e}")))
}
