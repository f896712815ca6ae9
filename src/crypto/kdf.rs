//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is not stored in backup files, so it is fixed:
//! changing it would make every existing encrypted backup unreadable.

use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::{Result, TotpVaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the AES-GCM nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count used for every backup.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte backup key from a password and salt.
///
/// The same password + salt always produce the same key. The key is
/// returned in a `Zeroizing` wrapper so it is wiped on drop.
pub fn derive_backup_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    derive_key_with_iterations(password, salt, PBKDF2_ITERATIONS)
}

/// Derive a 32-byte key with an explicit iteration count.
pub fn derive_key_with_iterations(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if iterations < 1 {
        return Err(TotpVaultError::KeyDerivationFailed(
            "PBKDF2 iterations must be at least 1".into(),
        ));
    }
    if salt.is_empty() {
        return Err(TotpVaultError::KeyDerivationFailed(
            "salt must not be empty".into(),
        ));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut *key);
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Generate a cryptographically random 12-byte AES-GCM nonce.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);
    nonce
}
