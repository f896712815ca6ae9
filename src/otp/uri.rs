//! `otpauth://totp/...` provisioning URI parsing.
//!
//! Only TOTP URIs are accepted.  The label becomes the credential name:
//!
//! | label               | issuer param | name                 |
//! |---------------------|--------------|----------------------|
//! | `Acme:alice`        | `Acme Inc`   | `Acme Inc - alice`   |
//! | `Acme:alice`        | (none)       | `alice`              |
//! | `alice`             | `Acme`       | `Acme - alice`       |
//! | (empty)             | (none)       | `Unnamed account`    |

use url::Url;

use crate::crypto::base32;
use crate::errors::{Result, TotpVaultError};

/// Name used when the URI carries no label at all.
const UNNAMED: &str = "Unnamed account";

/// A parsed provisioning URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningUri {
    pub name: String,
    /// Normalized secret (uppercase, no whitespace).
    pub secret: String,
    pub algorithm: Option<String>,
    pub digits: Option<u32>,
    pub period: Option<u32>,
}

/// Parse an `otpauth://totp/<label>?secret=...` URI.
pub fn parse_uri(uri: &str) -> Result<ProvisioningUri> {
    let url = Url::parse(uri.trim()).map_err(|e| TotpVaultError::InvalidUri(e.to_string()))?;

    if url.scheme() != "otpauth" {
        return Err(TotpVaultError::InvalidUri(
            "scheme must be otpauth://".into(),
        ));
    }

    if url.host_str() != Some("totp") {
        return Err(TotpVaultError::InvalidUri(
            "only TOTP URIs are supported".into(),
        ));
    }

    let mut secret = None;
    let mut issuer = None;
    let mut algorithm = None;
    let mut digits = None;
    let mut period = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "secret" => secret = Some(value.into_owned()),
            "issuer" => issuer = Some(value.into_owned()).filter(|s| !s.is_empty()),
            "algorithm" => algorithm = Some(value.into_owned()),
            "digits" => digits = Some(parse_number("digits", &value)?),
            "period" => period = Some(parse_number("period", &value)?),
            _ => {}
        }
    }

    let secret = secret
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| TotpVaultError::InvalidUri("missing secret parameter".into()))?;

    let label = decode_label(url.path())?;

    Ok(ProvisioningUri {
        name: build_name(&label, issuer.as_deref()),
        secret: base32::normalize(&secret),
        algorithm,
        digits,
        period,
    })
}

fn parse_number(field: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| TotpVaultError::InvalidUri(format!("{field} must be a number, got '{value}'")))
}

fn decode_label(path: &str) -> Result<String> {
    // Form decoding turns '+' into a space; labels keep it literally.
    let raw = path.strip_prefix('/').unwrap_or(path).replace('+', "%2B");
    url::form_urlencoded::parse(format!("l={raw}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| TotpVaultError::InvalidUri("unreadable label".into()))
}

fn build_name(label: &str, issuer: Option<&str>) -> String {
    let name = match (label.split_once(':'), issuer) {
        (Some((_, account)), Some(issuer)) => format!("{issuer} - {account}"),
        (Some((_, account)), None) => account.to_string(),
        (None, Some(issuer)) => format!("{issuer} - {label}"),
        (None, None) => label.to_string(),
    };

    if name.is_empty() {
        UNNAMED.to_string()
    } else {
        name
    }
}
