//! Integration tests for the totpvault crypto module.

use totpvault::crypto::base32;
use totpvault::crypto::kdf::{derive_key_with_iterations, KEY_LEN, NONCE_LEN, SALT_LEN};
use totpvault::crypto::{decrypt, encrypt, generate_nonce, generate_salt};
use totpvault::errors::TotpVaultError;

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; KEY_LEN];
    let nonce = generate_nonce();
    let plaintext = br#"{"version":"1.0","tokens":[]}"#;

    let ciphertext = encrypt(&key, &nonce, plaintext).expect("encrypt should succeed");

    // The 16-byte GCM tag is appended.
    assert_eq!(ciphertext.len(), plaintext.len() + 16);

    let recovered = decrypt(&key, &nonce, &ciphertext).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn different_nonces_give_different_ciphertext() {
    let key = [0xCDu8; KEY_LEN];
    let plaintext = b"JBSWY3DPEHPK3PXP";

    let ct1 = encrypt(&key, &generate_nonce(), plaintext).expect("encrypt 1");
    let ct2 = encrypt(&key, &generate_nonce(), plaintext).expect("encrypt 2");

    assert_ne!(ct1, ct2, "fresh nonces must change the ciphertext");
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let key = [0x11u8; KEY_LEN];
    let wrong_key = [0x22u8; KEY_LEN];
    let nonce = generate_nonce();

    let ciphertext = encrypt(&key, &nonce, b"secret").expect("encrypt");
    let result = decrypt(&wrong_key, &nonce, &ciphertext);

    assert!(matches!(result, Err(TotpVaultError::DecryptionFailed)));
}

#[test]
fn decrypt_with_wrong_nonce_length_fails() {
    let key = [0xAAu8; KEY_LEN];
    let result = decrypt(&key, &[0u8; 8], &[0u8; 32]);
    assert!(matches!(result, Err(TotpVaultError::DecryptionFailed)));
}

#[test]
fn decrypt_with_corrupted_ciphertext_fails() {
    let key = [0xBBu8; KEY_LEN];
    let nonce = generate_nonce();

    let mut ciphertext = encrypt(&key, &nonce, b"VALUE=abc").expect("encrypt");
    ciphertext[0] ^= 0xFF;

    assert!(decrypt(&key, &nonce, &ciphertext).is_err());
}

// ---------------------------------------------------------------------------
// Key derivation (PBKDF2-HMAC-SHA256)
// ---------------------------------------------------------------------------

#[test]
fn derive_key_same_inputs_same_output() {
    let salt = [7u8; SALT_LEN];
    let k1 = derive_key_with_iterations(b"password", &salt, 1_000).unwrap();
    let k2 = derive_key_with_iterations(b"password", &salt, 1_000).unwrap();
    assert_eq!(*k1, *k2);
}

#[test]
fn derive_key_depends_on_password_and_salt() {
    let salt = [7u8; SALT_LEN];
    let base = derive_key_with_iterations(b"password", &salt, 1_000).unwrap();
    let other_pw = derive_key_with_iterations(b"passw0rd", &salt, 1_000).unwrap();
    let other_salt = derive_key_with_iterations(b"password", &[8u8; SALT_LEN], 1_000).unwrap();

    assert_ne!(*base, *other_pw);
    assert_ne!(*base, *other_salt);
}

#[test]
fn salts_and_nonces_are_random_and_sized() {
    assert_eq!(generate_salt().len(), SALT_LEN);
    assert_eq!(generate_nonce().len(), NONCE_LEN);
    assert_ne!(generate_salt(), generate_salt());
    assert_ne!(generate_nonce(), generate_nonce());
}

// ---------------------------------------------------------------------------
// Base32
// ---------------------------------------------------------------------------

#[test]
fn base32_decodes_rfc_test_secret() {
    let key = base32::decode("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
    assert_eq!(key, b"12345678901234567890");
}

#[test]
fn base32_is_lenient_about_formatting() {
    let strict = base32::decode("JBSWY3DPEHPK3PXP").unwrap();
    assert_eq!(base32::decode("jbsw y3dp ehpk 3pxp").unwrap(), strict);
    assert_eq!(base32::decode("JBSWY3DPEHPK3PXP====").unwrap(), strict);
}

#[test]
fn base32_rejects_invalid_characters() {
    assert!(matches!(
        base32::decode("JBSWY3DP1"),
        Err(TotpVaultError::InvalidEncoding(_))
    ));
    assert!(!base32::is_valid("ABC!"));
    assert!(!base32::is_valid(""));
}

#[test]
fn base32_rejects_unicode_lookalikes() {
    assert!(matches!(
        base32::decode("JBSWY3DPEHPK3PXß"),
        Err(TotpVaultError::InvalidEncoding(_))
    ));
    assert!(!base32::is_valid("ſ"));
}
