//! Backup document layouts.
//!
//! Plaintext backup:
//!
//! ```text
//! { "version": "1.0", "exported_at": 1704124800000,
//!   "tokens": [ { "name": "GitHub", "secret": "JBSWY3DPEHPK3PXP" } ] }
//! ```
//!
//! `exportedAt` and `credentials` are accepted as aliases on import.
//!
//! Encrypted backup (all binary fields standard Base64):
//!
//! ```text
//! { "version": "1.0", "encrypted": true,
//!   "data": <ciphertext || tag>, "salt": <16 bytes>, "iv": <12 bytes> }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::CredentialInput;

/// Format version written into every backup.
pub const BACKUP_VERSION: &str = "1.0";

/// Default file name prefix for exports.
pub const DEFAULT_PREFIX: &str = "totp-backup";

/// A plaintext backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextBackup {
    pub version: String,

    /// Export time in epoch milliseconds.
    #[serde(alias = "exportedAt")]
    pub exported_at: i64,

    #[serde(alias = "credentials")]
    pub tokens: Vec<CredentialInput>,
}

/// An encrypted backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBackup {
    pub version: String,

    /// Always `true`; this is what `is_encrypted_file` keys on.
    pub encrypted: bool,

    /// AES-256-GCM ciphertext with the auth tag appended.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub data: Vec<u8>,

    /// PBKDF2 salt.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// AES-GCM nonce.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub iv: Vec<u8>,
}

/// A serialized backup ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub content: String,
    pub filename: String,
}

/// `<prefix>-<YYYYMMDD>.json` or `<prefix>-encrypted-<YYYYMMDD>.json`.
pub fn backup_filename(prefix: &str, date: NaiveDate, encrypted: bool) -> String {
    let stamp = date.format("%Y%m%d");
    if encrypted {
        format!("{prefix}-encrypted-{stamp}.json")
    } else {
        format!("{prefix}-{stamp}.json")
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_follow_convention() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            backup_filename("totp-backup", date, false),
            "totp-backup-20240105.json"
        );
        assert_eq!(
            backup_filename("totp-backup", date, true),
            "totp-backup-encrypted-20240105.json"
        );
    }

    #[test]
    fn encrypted_backup_uses_standard_base64() {
        let doc = EncryptedBackup {
            version: BACKUP_VERSION.into(),
            encrypted: true,
            data: vec![0xFB, 0xFF],
            salt: vec![0u8; 16],
            iv: vec![0u8; 12],
        };
        let json = serde_json::to_value(&doc).unwrap();
        // Standard alphabet: '+' and '/', not '-' and '_'.
        assert_eq!(json["data"], "+/8=");
        assert_eq!(json["encrypted"], true);
    }

    #[test]
    fn plaintext_backup_accepts_camel_case_aliases() {
        let doc: PlaintextBackup = serde_json::from_str(
            r#"{"version":"1.0","exportedAt":5,"credentials":[{"name":"a","secret":"B"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.exported_at, 5);
        assert_eq!(doc.tokens, vec![CredentialInput::new("a", "B")]);
    }
}
