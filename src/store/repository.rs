//! The storage capability the rest of the crate depends on.

use super::credential::{Credential, CredentialInput, CredentialUpdate};
use crate::errors::Result;

/// Persistence for credentials.
///
/// Implementations own id and timestamp assignment.  Backup import never
/// writes through this trait on its own; callers decide what to create or
/// update after inspecting an import outcome.
pub trait CredentialRepository {
    /// All credentials in insertion order.
    fn list(&self) -> Result<Vec<Credential>>;

    /// Look up one credential by id.
    fn get(&self, id: &str) -> Result<Option<Credential>>;

    /// Store a new credential, assigning its id and creation time.
    fn create(&mut self, input: CredentialInput) -> Result<Credential>;

    /// Change name and/or secret.  Fails with `CredentialNotFound` for an
    /// unknown id.
    fn update(&mut self, id: &str, changes: CredentialUpdate) -> Result<Credential>;

    /// Remove a credential.  Returns `false` if the id was unknown.
    fn delete(&mut self, id: &str) -> Result<bool>;

    /// First credential whose name matches exactly.
    fn find_by_name(&self, name: &str) -> Result<Option<Credential>> {
        Ok(self.list()?.into_iter().find(|c| c.name == name))
    }
}
