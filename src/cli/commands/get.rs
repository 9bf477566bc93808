//! `secrets-vault get`: print one secret or the whole document.

use serde_json::Value;

use crate::cli::render::{render, OutputFormat};
use crate::cli::{vault_location, Cli};
use crate::errors::Result;
use crate::vault::SecretsVault;

/// Execute the `get` command.
pub fn execute(cli: &Cli, key: Option<&str>, output: OutputFormat) -> Result<()> {
    let loc = vault_location(cli)?;
    let vault = SecretsVault::open(&loc.secrets_path, Some(&loc.master_key_path), loc.format)?;

    let text = match key {
        Some(key) => render(Some(key), vault.require(key)?, output)?,
        None => {
            let whole = Value::Object(vault.document().as_map().clone());
            render(None, &whole, output)?
        }
    };
    print!("{text}");

    Ok(())
}
