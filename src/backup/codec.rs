//! Backup export and import.
//!
//! Exports serialize `{name, secret}` pairs in input order.  Imports are
//! lenient about individual entries (incomplete ones are skipped) but
//! strict about the document shape, and report name collisions with the
//! caller's existing credentials without resolving them.
//!
//! Encrypted backups use PBKDF2-HMAC-SHA256 (100 000 rounds, 16-byte
//! salt) and AES-256-GCM (12-byte nonce).  Salt and nonce are fresh for
//! every export.

use std::collections::HashSet;

use chrono::{Local, Utc};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::format::{
    backup_filename, EncryptedBackup, ExportResult, PlaintextBackup, BACKUP_VERSION,
    DEFAULT_PREFIX,
};
use crate::crypto::kdf::NONCE_LEN;
use crate::crypto::{decrypt, derive_backup_key, encrypt, generate_nonce, generate_salt};
use crate::errors::{Result, TotpVaultError};
use crate::store::{Credential, CredentialInput};

/// What an import found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Entries that can be imported, in document order.
    pub credentials: Vec<CredentialInput>,

    /// Number of importable entries.
    pub total: usize,

    /// Names that already exist, one per colliding entry.
    pub duplicate_names: Vec<String>,
}

impl ImportOutcome {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_names.is_empty()
    }
}

/// Exports and imports backup documents.
#[derive(Debug, Clone)]
pub struct BackupCodec {
    prefix: String,
}

impl Default for BackupCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl BackupCodec {
    /// A codec whose export file names start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    // ------------------------------------------------------------------
    // Plaintext
    // ------------------------------------------------------------------

    /// Serialize `credentials` to a pretty-printed plaintext backup.
    pub fn export_plain(&self, credentials: &[Credential]) -> Result<ExportResult> {
        let content = serde_json::to_string_pretty(&plain_document(credentials))
            .map_err(|e| TotpVaultError::SerializationError(format!("backup: {e}")))?;

        debug!(count = credentials.len(), "exported plaintext backup");

        Ok(ExportResult {
            content,
            filename: backup_filename(&self.prefix, Local::now().date_naive(), false),
        })
    }

    /// Parse a plaintext backup and flag names already in `existing`.
    pub fn import_plain(&self, text: &str, existing: &[Credential]) -> Result<ImportOutcome> {
        import_plain(text, existing)
    }

    // ------------------------------------------------------------------
    // Encrypted
    // ------------------------------------------------------------------

    /// Serialize and encrypt `credentials` under `password`.
    pub fn export_encrypted(&self, credentials: &[Credential], password: &str) -> Result<ExportResult> {
        let plaintext = Zeroizing::new(
            serde_json::to_string(&plain_document(credentials))
                .map_err(|e| TotpVaultError::SerializationError(format!("backup: {e}")))?,
        );

        let salt = generate_salt();
        let nonce = generate_nonce();
        let key = derive_backup_key(password.as_bytes(), &salt)?;
        let data = encrypt(key.as_slice(), &nonce, plaintext.as_bytes())?;

        let document = EncryptedBackup {
            version: BACKUP_VERSION.to_string(),
            encrypted: true,
            data,
            salt: salt.to_vec(),
            iv: nonce.to_vec(),
        };

        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| TotpVaultError::SerializationError(format!("encrypted backup: {e}")))?;

        debug!(count = credentials.len(), "exported encrypted backup");

        Ok(ExportResult {
            content,
            filename: backup_filename(&self.prefix, Local::now().date_naive(), true),
        })
    }

    /// Decrypt an encrypted backup and run it through the plaintext import.
    ///
    /// A wrong password and a damaged file both produce `DecryptionFailed`.
    pub fn import_encrypted(
        &self,
        text: &str,
        password: &str,
        existing: &[Credential],
    ) -> Result<ImportOutcome> {
        let doc: Value = serde_json::from_str(text).map_err(|e| {
            TotpVaultError::InvalidEncryptedFormat(format!("not valid JSON: {e}"))
        })?;

        if doc.get("encrypted") != Some(&Value::Bool(true)) {
            return Err(TotpVaultError::InvalidEncryptedFormat(
                "missing \"encrypted\": true".into(),
            ));
        }

        let data = required_base64(&doc, "data")?;
        let salt = required_base64(&doc, "salt")?;
        let iv = required_base64(&doc, "iv")?;

        if iv.len() != NONCE_LEN {
            return Err(TotpVaultError::InvalidEncryptedFormat(format!(
                "iv must be {NONCE_LEN} bytes, got {}",
                iv.len()
            )));
        }

        let key = derive_backup_key(password.as_bytes(), &salt)?;
        let plaintext = decrypt(key.as_slice(), &iv, &data)?;

        let plaintext = Zeroizing::new(String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = Zeroizing::new(e.into_bytes());
            bad_bytes.clear();
            TotpVaultError::DecryptionFailed
        })?);

        import_plain(&plaintext, existing).map_err(|e| {
            debug!(error = %e, "decrypted backup has an invalid shape");
            TotpVaultError::DecryptionFailed
        })
    }

    // ------------------------------------------------------------------
    // Non-blocking entry points
    // ------------------------------------------------------------------

    /// `export_encrypted` on the blocking thread pool.
    pub async fn export_encrypted_async(
        &self,
        credentials: Vec<Credential>,
        password: Zeroizing<String>,
    ) -> Result<ExportResult> {
        let codec = self.clone();
        tokio::task::spawn_blocking(move || codec.export_encrypted(&credentials, &password))
            .await
            .map_err(task_failed)?
    }

    /// `import_encrypted` on the blocking thread pool.
    pub async fn import_encrypted_async(
        &self,
        text: String,
        password: Zeroizing<String>,
        existing: Vec<Credential>,
    ) -> Result<ImportOutcome> {
        let codec = self.clone();
        tokio::task::spawn_blocking(move || codec.import_encrypted(&text, &password, &existing))
            .await
            .map_err(task_failed)?
    }
}

/// Returns `true` if `text` is JSON with `"encrypted": true`.
///
/// Anything unparseable is treated as not encrypted.
pub fn is_encrypted_file(text: &str) -> bool {
    serde_json::from_str::<Value>(text)
        .map(|doc| doc.get("encrypted") == Some(&Value::Bool(true)))
        .unwrap_or(false)
}

/// Parse a plaintext backup document.
pub fn import_plain(text: &str, existing: &[Credential]) -> Result<ImportOutcome> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| TotpVaultError::InvalidFormat(format!("not valid JSON: {e}")))?;

    if !doc.get("version").is_some_and(is_truthy) {
        return Err(TotpVaultError::InvalidFormat("missing version".into()));
    }

    let entries = doc
        .get("tokens")
        .or_else(|| doc.get("credentials"))
        .and_then(Value::as_array)
        .ok_or_else(|| TotpVaultError::InvalidFormat("credential list is not an array".into()))?;

    let existing_names: HashSet<&str> = existing.iter().map(|c| c.name.as_str()).collect();
    let mut outcome = ImportOutcome::default();

    for entry in entries {
        let (Some(name), Some(secret)) = (non_empty_str(entry, "name"), non_empty_str(entry, "secret"))
        else {
            continue;
        };

        if existing_names.contains(name) {
            outcome.duplicate_names.push(name.to_string());
        }
        outcome.credentials.push(CredentialInput::new(name, secret));
    }

    outcome.total = outcome.credentials.len();

    debug!(
        total = outcome.total,
        duplicates = outcome.duplicate_names.len(),
        "parsed plaintext backup"
    );

    Ok(outcome)
}

fn task_failed(e: tokio::task::JoinError) -> TotpVaultError {
    TotpVaultError::TaskFailed(format!("backup worker: {e}"))
}

fn plain_document(credentials: &[Credential]) -> PlaintextBackup {
    PlaintextBackup {
        version: BACKUP_VERSION.to_string(),
        exported_at: Utc::now().timestamp_millis(),
        tokens: credentials.iter().map(Credential::to_input).collect(),
    }
}

fn non_empty_str<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// A present, non-empty field decoded from standard Base64.
fn required_base64(doc: &Value, field: &str) -> Result<Vec<u8>> {
    let encoded = non_empty_str(doc, field).ok_or_else(|| {
        TotpVaultError::InvalidEncryptedFormat(format!("missing \"{field}\""))
    })?;

    BASE64.decode(encoded).map_err(|e| {
        TotpVaultError::InvalidEncryptedFormat(format!("\"{field}\" is not valid Base64: {e}"))
    })
}

/// JSON truthiness: null, false, 0 and "" are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
