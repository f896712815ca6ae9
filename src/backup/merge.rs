//! Applying an import outcome to a repository.

use std::fmt;

use clap::ValueEnum;
use tracing::{debug, info};

use super::codec::ImportOutcome;
use crate::errors::Result;
use crate::store::{CredentialRepository, CredentialUpdate};

/// What to do with an imported entry whose name already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConflictPolicy {
    /// Leave the existing credential alone.
    #[default]
    Skip,
    /// Replace the secret of the existing credential.
    Overwrite,
    /// Create the imported entry next to the existing one.
    KeepBoth,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::KeepBoth => write!(f, "keep-both"),
        }
    }
}

/// Counts of what an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Write `outcome` into `repo`, resolving name collisions with `policy`.
///
/// Collisions are checked against the repository as it was before the
/// import started, so two same-named entries inside one backup never
/// collide with each other.
pub fn apply_import<R>(repo: &mut R, outcome: &ImportOutcome, policy: ConflictPolicy) -> Result<ImportReport>
where
    R: CredentialRepository + ?Sized,
{
    let before = repo.list()?;
    let mut report = ImportReport::default();

    for input in &outcome.credentials {
        let existing = before.iter().find(|c| c.name == input.name);

        match (existing, policy) {
            (None, _) | (Some(_), ConflictPolicy::KeepBoth) => {
                repo.create(input.clone())?;
                report.created += 1;
            }
            (Some(_), ConflictPolicy::Skip) => {
                debug!(name = %input.name, "skipping existing credential");
                report.skipped += 1;
            }
            (Some(current), ConflictPolicy::Overwrite) => {
                repo.update(&current.id, CredentialUpdate::secret(input.secret.clone()))?;
                report.updated += 1;
            }
        }
    }

    info!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        %policy,
        "import applied"
    );

    Ok(report)
}
