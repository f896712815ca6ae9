//! JSON-file credential repository.
//!
//! The whole store is one JSON array:
//!
//! ```text
//! [{"id":"1704124800000-k3j9x0a1b","name":"GitHub","secret":"JBSW...","createdAt":1704124800000}]
//! ```
//!
//! Every mutation rewrites the file atomically (temp file + rename) so a
//! crash never leaves a half-written store behind. The in-memory list only
//! changes once the write has succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use super::credential::{Credential, CredentialInput, CredentialUpdate};
use super::repository::CredentialRepository;
use crate::errors::{Result, TotpVaultError};

/// Characters used for the random part of an id.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part of an id.
const ID_SUFFIX_LEN: usize = 9;

/// A credential store backed by a single JSON file.
pub struct FileRepository {
    path: PathBuf,
    credentials: Vec<Credential>,
}

impl FileRepository {
    /// Open the store at `path`.  A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: &Path) -> Result<Self> {
        let credentials = if path.exists() {
            let data = fs::read_to_string(path)?;
            if data.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&data).map_err(|e| TotpVaultError::StoreError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
            }
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), count = credentials.len(), "opened credential store");

        Ok(Self {
            path: path.to_path_buf(),
            credentials,
        })
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of stored credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Write `next` to disk and only then make it the in-memory state.
    fn commit(&mut self, next: Vec<Credential>) -> Result<()> {
        self.save(&next)?;
        self.credentials = next;
        Ok(())
    }

    /// Serialize `credentials` and write them to disk atomically.
    fn save(&self, credentials: &[Credential]) -> Result<()> {
        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| TotpVaultError::SerializationError(format!("credentials: {e}")))?;

        let parent = self.path.parent().unwrap_or(Path::new("."));
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        fs::write(&tmp_path, &json)?;

        // The store holds plaintext secrets: owner-only on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.credentials.iter().position(|c| c.id == id)
    }
}

impl CredentialRepository for FileRepository {
    fn list(&self) -> Result<Vec<Credential>> {
        Ok(self.credentials.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Credential>> {
        Ok(self.credentials.iter().find(|c| c.id == id).cloned())
    }

    fn create(&mut self, input: CredentialInput) -> Result<Credential> {
        let credential = Credential {
            id: generate_id(),
            name: input.name,
            secret: input.secret,
            created_at: Utc::now(),
        };

        let mut next = self.credentials.clone();
        next.push(credential.clone());
        self.commit(next)?;

        debug!(id = %credential.id, "created credential");
        Ok(credential)
    }

    fn update(&mut self, id: &str, changes: CredentialUpdate) -> Result<Credential> {
        let index = self
            .position(id)
            .ok_or_else(|| TotpVaultError::CredentialNotFound(id.to_string()))?;

        let mut next = self.credentials.clone();
        changes.apply_to(&mut next[index]);
        let updated = next[index].clone();
        self.commit(next)?;

        debug!(id, "updated credential");
        Ok(updated)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.credentials.clone();
        next.remove(index);
        self.commit(next)?;

        debug!(id, "deleted credential");
        Ok(true)
    }
}

/// `<epoch-ms>-<9 random base36 chars>`
fn generate_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{suffix}", Utc::now().timestamp_millis())
}
