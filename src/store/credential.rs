//! Credential types held by a repository.
//!
//! `Credential` is what the store persists.  `CredentialInput` is the
//! portable part (name + secret) that travels through backups; ids and
//! creation times are local to one store and never exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored TOTP credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Opaque unique identifier assigned by the repository.
    pub id: String,

    /// Display name (e.g. "GitHub - alice").
    pub name: String,

    /// Base32-encoded shared secret.
    pub secret: String,

    /// When this credential was created (epoch milliseconds on disk).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// The portable `{name, secret}` projection of this credential.
    pub fn to_input(&self) -> CredentialInput {
        CredentialInput {
            name: self.name.clone(),
            secret: self.secret.clone(),
        }
    }
}

/// The fields needed to create a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInput {
    pub name: String,
    pub secret: String,
}

impl CredentialInput {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialUpdate {
    pub name: Option<String>,
    pub secret: Option<String>,
}

impl CredentialUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            secret: None,
        }
    }

    pub fn secret(secret: impl Into<String>) -> Self {
        Self {
            name: None,
            secret: Some(secret.into()),
        }
    }

    /// Apply the update to `credential` in place.
    pub fn apply_to(self, credential: &mut Credential) {
        if let Some(name) = self.name {
            credential.name = name;
        }
        if let Some(secret) = self.secret {
            credential.secret = secret;
        }
    }
}
