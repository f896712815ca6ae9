//! RFC 4648 Base32 decoding for TOTP secrets.
//!
//! Secrets are typed or pasted by people, so both validation and decoding
//! are lenient about case, embedded whitespace and trailing `=` padding.
//! Only the ASCII alphabet is accepted. Decoding keeps only complete bytes:
//! leftover bits at the end of the input (fewer than 8) are dropped.

use ::base32::Alphabet;

use crate::errors::{Result, TotpVaultError};

fn in_alphabet(c: char) -> bool {
    matches!(c, 'A'..='Z' | '2'..='7')
}

/// Uppercase `text` and drop all whitespace.
///
/// This is the canonical form a secret is stored in. Only ASCII letters are
/// case-folded; anything else is kept as-is so validation can reject it.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Returns `true` if `text` is a well-formed Base32 secret.
///
/// At least one alphabet character is required, optionally followed by
/// `=` padding. Whitespace anywhere is ignored.
pub fn is_valid(text: &str) -> bool {
    let cleaned = normalize(text);
    let body = cleaned.trim_end_matches('=');
    !body.is_empty() && body.chars().all(in_alphabet)
}

/// Decode a Base32 string into raw bytes.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let cleaned = normalize(text);
    let body = cleaned.trim_end_matches('=');

    if let Some((pos, c)) = body.chars().enumerate().find(|(_, c)| !in_alphabet(*c)) {
        return Err(TotpVaultError::InvalidEncoding(format!(
            "character '{c}' at position {pos} is not in the Base32 alphabet"
        )));
    }

    ::base32::decode(Alphabet::Rfc4648 { padding: false }, body)
        .ok_or_else(|| TotpVaultError::InvalidEncoding("malformed Base32 input".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hello_secret() {
        // "Hello!" followed by 0xDE 0xAD 0xBE 0xEF
        let bytes = decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(bytes, b"Hello!\xDE\xAD\xBE\xEF");
    }

    #[test]
    fn decode_is_case_and_whitespace_insensitive() {
        let canonical = decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(decode("jbswy3dpehpk3pxp").unwrap(), canonical);
        assert_eq!(decode("JBSW Y3DP\tEHPK\n3PXP").unwrap(), canonical);
    }

    #[test]
    fn decode_strips_trailing_padding() {
        assert_eq!(decode("JBSWY3DP====").unwrap(), b"Hello");
        assert_eq!(decode("MZXW6===").unwrap(), b"foo");
    }

    #[test]
    fn decode_discards_incomplete_trailing_bits() {
        // 'A' alone is 5 bits, not a full byte.
        assert!(decode("A").unwrap().is_empty());
        // 'MZXQ' is 20 bits: two full bytes, 4 leftover bits.
        assert_eq!(decode("MZXQ").unwrap(), b"fo");
    }

    #[test]
    fn decode_rejects_invalid_characters() {
        let err = decode("INVALID!!!").unwrap_err();
        assert!(matches!(err, TotpVaultError::InvalidEncoding(_)));
        assert!(decode("Contains0and1").is_err());
        assert!(decode("AB=CD").is_err());
    }

    #[test]
    fn validation_matches_alphabet() {
        assert!(is_valid("JBSWY3DPEHPK3PXP"));
        assert!(is_valid("HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ"));
        assert!(is_valid("ABCDEFGHIJKLMNOPQRSTUVWXYZ234567"));
        assert!(is_valid("JBSW Y3DP EHPK 3PXP"));
        assert!(is_valid("jbswy3dpehpk3pxp"));
        assert!(is_valid("JBSWY3DP===="));

        assert!(!is_valid("INVALID!!!"));
        assert!(!is_valid("Contains0and1"));
        assert!(!is_valid("JBSW=Y3DP"));
        assert!(!is_valid(""));
        assert!(!is_valid("===="));
    }

    #[test]
    fn normalize_uppercases_and_strips_whitespace() {
        assert_eq!(normalize(" jbsw y3dp\n"), "JBSWY3DP");
    }

    #[test]
    fn decodes_rfc_test_secret() {
        assert_eq!(
            decode("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap(),
            b"12345678901234567890"
        );
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        // These case-map to ASCII letters under full Unicode rules.
        assert!(!is_valid("ß"));
        assert!(!is_valid("JBSWY3DPEHPK3PXß"));
        assert!(matches!(decode("ßſı"), Err(TotpVaultError::InvalidEncoding(_))));
        assert_eq!(normalize("ßa"), "ßA");
    }
}
