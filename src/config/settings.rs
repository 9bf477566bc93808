use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::vault::Format;

/// Project-level configuration, loaded from `.secrets-vault.toml`.
///
/// Every field has a sensible default so the vault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Encrypted secrets file (relative to the project root).
    #[serde(default = "default_secrets_file")]
    pub secrets_file: String,

    /// Master key file (relative to the project root).
    #[serde(default = "default_master_key_file")]
    pub master_key_file: String,

    /// Document format; inferred from `secrets_file` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_secrets_file() -> String {
    "secrets.toml.enc".to_string()
}

fn default_master_key_file() -> String {
    "master.key".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            secrets_file: default_secrets_file(),
            master_key_file: default_master_key_file(),
            format: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".secrets-vault.toml";

    /// Load settings from `<project_dir>/.secrets-vault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Full path to the encrypted secrets file.
    pub fn secrets_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.secrets_file)
    }

    /// Full path to the master key file.
    pub fn master_key_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.master_key_file)
    }

    /// The configured format, or the one implied by the secrets file name.
    pub fn format(&self) -> Format {
        self.format
            .unwrap_or_else(|| Format::infer(Path::new(&self.secrets_file)).unwrap_or_default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
