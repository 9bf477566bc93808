//! `secrets-vault delete`: remove a secret.

use crate::cli::output;
use crate::cli::{vault_location, Cli};
use crate::errors::Result;
use crate::vault::SecretsVault;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    let loc = vault_location(cli)?;
    let mut vault = SecretsVault::open(&loc.secrets_path, Some(&loc.master_key_path), loc.format)?;

    if vault.delete(key).is_none() {
        output::info(&format!("Secret '{key}' was not set"));
        return Ok(());
    }
    vault.save()?;

    output::success(&format!("Deleted secret '{key}'"));
    Ok(())
}
