//! `secrets-vault edit`: open the decrypted secrets in `$EDITOR`.
//!
//! The document is written to an owner-only temp file, the editor runs on
//! it, and the result is re-encrypted if anything changed.  The temp file
//! is wiped and removed however the editor exits.

use crate::cli::output;
use crate::cli::{vault_location, Cli};
use crate::errors::Result;
use crate::vault::{EditOutcome, SecretsVault};

/// Execute the `edit` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let loc = vault_location(cli)?;
    let mut vault = SecretsVault::open(&loc.secrets_path, Some(&loc.master_key_path), loc.format)?;

    match vault.edit_interactive()? {
        EditOutcome::Unchanged => output::info("No changes detected."),
        EditOutcome::Saved => output::success(&format!(
            "Saved changes to {}",
            vault.path().display()
        )),
    }

    Ok(())
}
