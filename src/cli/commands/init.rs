//! `secrets-vault init`: create a new secrets file and master key.

use crate::cli::output;
use crate::cli::{vault_location, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::SecretsVault;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let loc = vault_location(cli)?;

    let (vault, master_key) =
        match SecretsVault::create(&loc.secrets_path, &loc.master_key_path, loc.format) {
            Ok(created) => created,
            Err(VaultError::VaultAlreadyExists(path)) => {
                output::info(&format!("Secrets file {} already exists", path.display()));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

    output::success(&format!(
        "Created secrets file {} ({} format)",
        vault.path().display(),
        vault.format()
    ));
    output::info(&format!(
        "Generated new encryption master key in {}:",
        loc.master_key_path.display()
    ));
    println!("{}", master_key.as_str());
    output::warning("Keep it safe! It will not be shown again.");
    output::tip("Keep the key file out of version control, or set MASTER_KEY instead.");

    Ok(())
}
