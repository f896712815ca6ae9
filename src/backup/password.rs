//! Backup password rules.

use std::fmt;

use crate::errors::{Result, TotpVaultError};

/// Minimum length accepted for a backup password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Length at which a password with mixed character classes rates `Strong`.
const STRONG_PASSWORD_LEN: usize = 12;

/// A coarse strength rating shown before an encrypted export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Medium => write!(f, "medium"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

/// Rate `password`.
pub fn rate(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return PasswordStrength::Weak;
    }

    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if len >= STRONG_PASSWORD_LEN && has_letter && has_digit && has_symbol {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Medium
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`].
pub fn check_backup_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TotpVaultError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
