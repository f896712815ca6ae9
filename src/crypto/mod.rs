//! Cryptographic primitives for totpvault.
//!
//! This module provides:
//! - Base32 secret decoding and validation (`base32`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)

pub mod base32;
pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_backup_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_backup_key, generate_nonce, generate_salt, PBKDF2_ITERATIONS};
