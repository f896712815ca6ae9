//! Backup module: moving credentials in and out of portable documents.
//!
//! - `format`: the on-disk JSON layouts
//! - `codec`: plaintext and encrypted export/import
//! - `merge`: writing an import into a repository
//! - `password`: backup password rules

pub mod codec;
pub mod format;
pub mod merge;
pub mod password;

pub use codec::{import_plain, is_encrypted_file, BackupCodec, ImportOutcome};
pub use format::{backup_filename, EncryptedBackup, ExportResult, PlaintextBackup, BACKUP_VERSION};
pub use merge::{apply_import, ConflictPolicy, ImportReport};
pub use password::{check_backup_password, rate, PasswordStrength, MIN_PASSWORD_LEN};
