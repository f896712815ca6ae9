use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backup::format::DEFAULT_PREFIX;
use crate::errors::{Result, TotpVaultError};
use crate::otp::{TotpParams, MAX_DIGITS};

/// Project-level configuration, loaded from `.totpvault.toml`.
///
/// Every field has a default, so no config file is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Credential store file, relative to the project directory.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Prefix for exported backup file names.
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,

    /// Code length.
    #[serde(default = "default_digits")]
    pub digits: u32,

    /// Time step in seconds.
    #[serde(default = "default_period")]
    pub period: u32,

    /// How often the countdown ticker samples the clock.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_file() -> String {
    "totp-tokens.json".to_string()
}

fn default_backup_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_digits() -> u32 {
    6
}

fn default_period() -> u32 {
    30
}

fn default_tick_interval_ms() -> u64 {
    100
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            backup_prefix: default_backup_prefix(),
            digits: default_digits(),
            period: default_period(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Settings {
    /// Name of the config file looked up in the project directory.
    pub const FILE_NAME: &'static str = ".totpvault.toml";

    /// Load settings from `<project_dir>/.totpvault.toml`.
    ///
    /// A missing file yields defaults.  A file that fails to parse or
    /// validate is an error.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            TotpVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the generator or ticker cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.store_file.trim().is_empty() {
            return Err(TotpVaultError::ConfigError("store_file cannot be empty".into()));
        }
        if self.backup_prefix.trim().is_empty() {
            return Err(TotpVaultError::ConfigError("backup_prefix cannot be empty".into()));
        }
        if !(1..=MAX_DIGITS).contains(&self.digits) {
            return Err(TotpVaultError::ConfigError(format!(
                "digits must be between 1 and {MAX_DIGITS}, got {}",
                self.digits
            )));
        }
        if self.period == 0 {
            return Err(TotpVaultError::ConfigError("period must be at least 1 second".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(TotpVaultError::ConfigError(
                "tick_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Full path to the credential store.
    ///
    /// Example: `project_dir/totp-tokens.json`
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_file)
    }

    /// Generator parameters.
    pub fn totp_params(&self) -> TotpParams {
        TotpParams {
            digits: self.digits,
            period: self.period,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.store_file, "totp-tokens.json");
        assert_eq!(s.backup_prefix, "totp-backup");
        assert_eq!(s.digits, 6);
        assert_eq!(s.period, 30);
        assert_eq!(s.tick_interval(), Duration::from_millis(100));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
store_file = "tokens/mine.json"
backup_prefix = "otp"
digits = 8
period = 60
tick_interval_ms = 250
"#;
        fs::write(tmp.path().join(".totpvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_file, "tokens/mine.json");
        assert_eq!(settings.backup_prefix, "otp");
        assert_eq!(settings.totp_params(), TotpParams { digits: 8, period: 60 });
        assert_eq!(settings.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".totpvault.toml"), "digits = 8\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.digits, 8);
        assert_eq!(settings.period, 30);
        assert_eq!(settings.store_file, "totp-tokens.json");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".totpvault.toml"), "not valid {{toml").unwrap();

        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".totpvault.toml"), "period = 0\n").unwrap();
        assert!(matches!(
            Settings::load(tmp.path()),
            Err(TotpVaultError::ConfigError(_))
        ));

        fs::write(tmp.path().join(".totpvault.toml"), "digits = 12\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn store_path_joins_project_dir() {
        let s = Settings::default();
        let project = Path::new("/home/user/project");
        assert_eq!(
            s.store_path(project),
            PathBuf::from("/home/user/project/totp-tokens.json")
        );
    }
}
