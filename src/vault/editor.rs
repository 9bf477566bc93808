//! External editor support for `SecretsVault::edit_with`.
//!
//! The decrypted document is written to a scratch file, the editor is run
//! on it, and the edited bytes are read back.  The scratch file:
//!
//! - gets an unpredictable name and owner-only permissions (`tempfile`),
//! - is overwritten with zeros and removed when it goes out of scope, so
//!   it disappears on every exit path, including editor and I/O failures.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::config::EDITOR_ENV;
use crate::errors::{Result, VaultError};

/// An editor command line such as `vim` or `code --wait`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Read the editor from `$EDITOR`.  There is no fallback editor.
    pub fn from_env() -> Result<Self> {
        let command = std::env::var(EDITOR_ENV).map_err(|_| VaultError::EditorNotConfigured)?;
        Self::parse(&command)
    }

    /// Split a command line on whitespace.
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(VaultError::EditorNotConfigured)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The program that will be launched.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Extra arguments placed before the file path.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Let the user edit `contents` and return what they saved.
    ///
    /// Blocks until the editor exits.  `extension` becomes the scratch
    /// file's suffix so editors pick the right syntax highlighting.
    pub(crate) fn edit(&self, contents: &[u8], extension: &str) -> Result<Zeroizing<Vec<u8>>> {
        let scratch = ScratchFile::create(contents, extension)?;

        tracing::debug!(editor = %self.program, "launching editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(scratch.path())
            .status()
            .map_err(|e| {
                VaultError::EditorFailed(format!("failed to launch '{}': {e}", self.program))
            })?;

        if !status.success() {
            return Err(VaultError::EditorFailed(match status.code() {
                Some(code) => format!("editor exited with code {code}"),
                None => "editor terminated by signal".to_string(),
            }));
        }

        let edited = fs::read(scratch.path())
            .map_err(|e| VaultError::EditorFailed(format!("failed to read edited file: {e}")))?;
        Ok(Zeroizing::new(edited))
    }
}

/// A temp file holding plaintext secrets, wiped and removed on drop.
struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    fn create(contents: &[u8], extension: &str) -> Result<Self> {
        let suffix = format!(".{extension}");
        let mut file = tempfile::Builder::new()
            .prefix("secrets-vault-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(contents)?;
        file.flush()?;
        Ok(Self { file })
    }

    fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // The editor may have replaced the file, so wipe whatever is at
        // the path now.  `NamedTempFile` removes it right after.
        wipe(self.file.path());
    }
}

/// Overwrite a file's contents with zeros.  Best-effort.
fn wipe(path: &Path) {
    let Ok(metadata) = fs::metadata(path) else {
        return;
    };
    let len = usize::try_from(metadata.len()).unwrap_or(0);
    if len == 0 {
        return;
    }
    if let Ok(mut file) = fs::OpenOptions::new().write(true).open(path) {
        let _ = file.write_all(&vec![0u8; len]);
        let _ = file.flush();
    }
}
