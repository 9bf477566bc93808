//! Master key file handling and key resolution.
//!
//! The key file holds the hex-encoded master key as plain text.  When a
//! vault is opened, the key is looked up in this order:
//!
//! 1. The `MASTER_KEY` environment variable.
//! 2. The key file, whitespace-trimmed.
//!
//! The environment variable always wins when both are present.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::config::MASTER_KEY_ENV;
use crate::errors::{Result, VaultError};

/// Write `key` verbatim to `path`, creating parent directories.
///
/// On Unix the file is restricted to owner-only read/write.
pub fn write_key_file(path: &Path, key: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    if path.exists() {
        tracing::warn!(path = %path.display(), "overwriting existing master key file");
    }

    fs::write(path, key)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Read a key file, returning `None` if it does not exist or is blank.
pub fn read_key_file(path: &Path) -> Result<Option<Zeroizing<String>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = Zeroizing::new(fs::read_to_string(path)?);
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(Zeroizing::new(trimmed.to_string())))
}

/// Find the master key in the environment or in `key_path`.
pub fn resolve_master_key(key_path: Option<&Path>) -> Result<Zeroizing<String>> {
    let from_env = std::env::var(MASTER_KEY_ENV).ok().map(Zeroizing::new);
    resolve_from(from_env, key_path)
}

/// Resolution logic with the environment value passed in explicitly.
fn resolve_from(
    env_value: Option<Zeroizing<String>>,
    key_path: Option<&Path>,
) -> Result<Zeroizing<String>> {
    if let Some(key) = env_value {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            tracing::debug!("using master key from {MASTER_KEY_ENV}");
            return Ok(Zeroizing::new(trimmed.to_string()));
        }
    }

    if let Some(path) = key_path {
        if let Some(key) = read_key_file(path)? {
            tracing::debug!(path = %path.display(), "using master key from file");
            return Ok(key);
        }
    }

    Err(VaultError::MasterKeyNotFound(
        key_path.map(Path::to_path_buf).unwrap_or_else(PathBuf::new),
    ))
}
