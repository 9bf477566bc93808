//! High-level vault operations.
//!
//! `SecretsVault` ties together the encryption backend, the secrets file
//! on disk, and the decrypted document held in memory.  Mutations only
//! touch the in-memory copy; `save` is the one operation that writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::crypto::{resolve_master_key, write_key_file, Aes256GcmBackend, Backend};
use crate::errors::{Result, VaultError};

use super::document::SecretsDocument;
use super::editor::EditorCommand;
use super::format::{self, Format};

/// What `edit_with` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edited document matched the original; nothing was written.
    Unchanged,
    /// The edited document replaced the original and was saved.
    Saved,
}

/// The main vault handle.  Create one with `SecretsVault::create` or one
/// of the `open` constructors, then use its methods to manage secrets.
pub struct SecretsVault {
    /// Path to the encrypted secrets file.
    path: PathBuf,

    /// Format of the decrypted document.
    format: Format,

    /// Encrypts and decrypts the file contents (holds the master key).
    backend: Box<dyn Backend>,

    /// The decrypted secrets.
    document: SecretsDocument,
}

impl std::fmt::Debug for SecretsVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsVault")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("entries", &self.document.len())
            .finish_non_exhaustive()
    }
}

impl SecretsVault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new vault at `secrets_path`.
    ///
    /// Generates a master key, writes it to `master_key_path`, fills the
    /// document with the example for `format` and saves it.  Returns the
    /// handle and the key; the key is not retrievable afterwards.
    ///
    /// Never overwrites an existing secrets file.
    pub fn create(
        secrets_path: &Path,
        master_key_path: &Path,
        format: Format,
    ) -> Result<(Self, Zeroizing<String>)> {
        if secrets_path.exists() {
            return Err(VaultError::VaultAlreadyExists(secrets_path.to_path_buf()));
        }

        tracing::info!(path = %secrets_path.display(), "creating new secrets file");
        if let Some(parent) = secrets_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let master_key = Aes256GcmBackend::generate_master_key();
        write_key_file(master_key_path, &master_key)?;

        let document = format::deserialize(format.example().as_bytes(), format)?;
        let mut vault = Self {
            path: secrets_path.to_path_buf(),
            format,
            backend: Box::new(Aes256GcmBackend::new(Some(master_key.as_str()))),
            document,
        };
        vault.save()?;

        Ok((vault, master_key))
    }

    /// Open an existing vault, finding the master key in `MASTER_KEY` or
    /// in `master_key_path`.
    pub fn open(secrets_path: &Path, master_key_path: Option<&Path>, format: Format) -> Result<Self> {
        let master_key = resolve_master_key(master_key_path)?;
        Self::open_with_key(secrets_path, &master_key, format)
    }

    /// Open an existing vault with an explicit hex master key.
    pub fn open_with_key(secrets_path: &Path, master_key: &str, format: Format) -> Result<Self> {
        let backend = Aes256GcmBackend::new(Some(master_key));
        Self::open_with_backend(secrets_path, Box::new(backend), format)
    }

    /// Open an existing vault with any encryption backend.
    pub fn open_with_backend(
        secrets_path: &Path,
        backend: Box<dyn Backend>,
        format: Format,
    ) -> Result<Self> {
        let mut vault = Self {
            path: secrets_path.to_path_buf(),
            format,
            backend,
            document: SecretsDocument::new(),
        };
        vault.load()?;
        Ok(vault)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Read and decrypt the secrets file, replacing the in-memory document.
    ///
    /// An empty file is an empty document.
    pub fn load(&mut self) -> Result<()> {
        tracing::info!(path = %self.path.display(), "loading encrypted secrets");
        if !self.path.exists() {
            return Err(VaultError::VaultNotFound(self.path.clone()));
        }

        let contents = fs::read(&self.path)?;
        if contents.iter().all(u8::is_ascii_whitespace) {
            self.document = SecretsDocument::new();
            return Ok(());
        }

        // Blobs are base64 text; anything else cannot have come from us.
        let blob = String::from_utf8(contents).map_err(|_| VaultError::MasterKeyInvalid)?;
        let plaintext = Zeroizing::new(self.backend.decrypt(&blob)?);
        self.document = format::deserialize(&plaintext, self.format)?;
        Ok(())
    }

    /// Serialize, encrypt and write the document.
    ///
    /// The new contents go to a temp file in the same directory which is
    /// then renamed over the secrets file, so a failure at any step
    /// leaves the previous file intact.
    pub fn save(&mut self) -> Result<()> {
        let plaintext = Zeroizing::new(format::serialize(&self.document, self.format)?);
        let blob = self.backend.encrypt(&plaintext)?;
        write_atomic(&self.path, blob.as_bytes())?;
        tracing::info!(path = %self.path.display(), "wrote encrypted secrets");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Look up a dotted path such as `app.secret-key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Look up a dotted path, falling back to `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.document.get(key).unwrap_or(default)
    }

    /// Look up a dotted path that must exist.
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.document
            .get(key)
            .ok_or_else(|| VaultError::KeyNotFound(key.to_string()))
    }

    /// Set a value at a dotted path (in memory; call `save` to persist).
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.document.set(key, value.into())
    }

    /// Remove the value at a dotted path, if any (in memory).
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.document.remove(key)
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Edit the secrets in the editor named by `$EDITOR`.
    pub fn edit_interactive(&mut self) -> Result<EditOutcome> {
        let editor = EditorCommand::from_env()?;
        self.edit_with(&editor)
    }

    /// Edit the secrets with `editor`, saving only if something changed.
    pub fn edit_with(&mut self, editor: &EditorCommand) -> Result<EditOutcome> {
        let original = Zeroizing::new(format::serialize(&self.document, self.format)?);
        let edited = editor.edit(&original, self.format.extension())?;

        let document = format::deserialize(&edited, self.format)?;
        let rendered = Zeroizing::new(format::serialize(&document, self.format)?);
        if rendered.as_slice() == original.as_slice() {
            tracing::debug!("No changes detected");
            return Ok(EditOutcome::Unchanged);
        }

        self.document = document;
        self.save()?;
        Ok(EditOutcome::Saved)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the secrets file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the document format used by `load` and `save`.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Change the format used by later saves.
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// Returns the decrypted document.
    pub fn document(&self) -> &SecretsDocument {
        &self.document
    }

    /// Replace the whole document (in memory).
    pub fn replace_document(&mut self, document: SecretsDocument) {
        self.document = document;
    }
}

/// Write `bytes` to `path` via a temp file and rename.
///
/// The temp file lives in the same directory so the rename stays on one
/// filesystem.  It is created owner-only, and so is the final file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| VaultError::Io(e.error))?;
    Ok(())
}
