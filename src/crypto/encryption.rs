//! AES-256-GCM authenticated encryption.
//!
//! Backups store the nonce (`iv`) next to the ciphertext instead of
//! prepending it, so both functions take the nonce explicitly.  The
//! returned ciphertext carries the 16-byte auth tag at its end.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use super::kdf::NONCE_LEN;
use crate::errors::{Result, TotpVaultError};

/// Encrypt `plaintext` with a 32-byte `key` under `nonce`.
///
/// Returns `ciphertext || tag`.
pub fn encrypt(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| TotpVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| TotpVaultError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt `ciphertext || tag` produced by `encrypt`.
///
/// Every failure (bad key, bad nonce, failed tag check) collapses into
/// `DecryptionFailed` so callers cannot tell them apart.
pub fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(TotpVaultError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TotpVaultError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| TotpVaultError::DecryptionFailed)
}
