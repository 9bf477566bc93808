use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in the secrets vault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Master key errors ---
    #[error(
        "Could not find encryption master key. Set it as an environment variable 'MASTER_KEY', or in a file '{}'",
        .0.display()
    )]
    MasterKeyNotFound(PathBuf),

    /// Malformed key and failed authentication are deliberately the same error.
    #[error("The master key is invalid. Make sure it is set and you are using the correct one.")]
    MasterKeyInvalid,

    // --- Document errors ---
    #[error("Secret '{0}' not found in secrets vault")]
    KeyNotFound(String),

    #[error("Invalid key path '{0}'")]
    InvalidKeyPath(String),

    #[error("Could not parse secrets file: {0}")]
    MalformedDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown file format '{0}' (expected 'json' or 'toml')")]
    UnknownFormat(String),

    // --- Vault file errors ---
    #[error("Could not find secrets file {0}")]
    VaultNotFound(PathBuf),

    #[error("Secrets file {0} already exists")]
    VaultAlreadyExists(PathBuf),

    // --- Editor errors ---
    #[error("No interactive editor set. Set it as an environment variable 'EDITOR'")]
    EditorNotConfigured,

    #[error("Editor error: {0}")]
    EditorFailed(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for vault results.
pub type Result<T> = std::result::Result<T, VaultError>;
