use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in totpvault.
#[derive(Debug, Error)]
pub enum TotpVaultError {
    // --- Encoding / OTP errors ---
    #[error("Invalid Base32 secret: {0}")]
    InvalidEncoding(String),

    #[error("Invalid OTP parameter: {0}")]
    InvalidParameter(String),

    #[error("HMAC error: {0}")]
    HmacError(String),

    #[error("Invalid otpauth URI: {0}")]
    InvalidUri(String),

    // --- Backup errors ---
    #[error("Invalid backup file format: {0}")]
    InvalidFormat(String),

    #[error("Invalid encrypted backup format: {0}")]
    InvalidEncryptedFormat(String),

    #[error("Decryption failed: wrong password or corrupted backup")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Runtime errors ---
    #[error("No async runtime available: {0}")]
    RuntimeUnavailable(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    // --- Store errors ---
    #[error("Credential '{0}' not found")]
    CredentialNotFound(String),

    #[error("Credential store at {path} is unreadable: {reason}")]
    StoreError { path: PathBuf, reason: String },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Password mismatch: passwords do not match")]
    PasswordMismatch,

    #[error("Password too weak: {0}")]
    WeakPassword(String),
}

/// Convenience type alias for totpvault results.
pub type Result<T> = std::result::Result<T, TotpVaultError>;
