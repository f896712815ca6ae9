//! Credential persistence.
//!
//! This module provides:
//! - `Credential`, `CredentialInput` and `CredentialUpdate` types (`credential`)
//! - The `CredentialRepository` trait (`repository`)
//! - A JSON-file implementation, `FileRepository` (`file`)

pub mod credential;
pub mod file;
pub mod repository;

// Re-export the most commonly used items.
pub use credential::{Credential, CredentialInput, CredentialUpdate};
pub use file::FileRepository;
pub use repository::CredentialRepository;
