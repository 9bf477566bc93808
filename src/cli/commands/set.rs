//! `secrets-vault set`: add or update a secret.

use std::io::{self, IsTerminal, Read};

use serde_json::Value;

use crate::cli::output;
use crate::cli::{vault_location, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::SecretsVault;

/// Execute the `set` command.
pub fn execute(cli: &Cli, key: &str, value: Option<&str>, as_json: bool) -> Result<()> {
    let raw = match value {
        Some(v) => {
            output::warning("Value provided on command line; it may appear in shell history.");
            v.to_string()
        }
        None if !io::stdin().is_terminal() => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf.trim_end().to_string()
        }
        None => {
            return Err(VaultError::CommandFailed(format!(
                "no value given for '{key}'; pass it as an argument or pipe it on stdin"
            )));
        }
    };

    let value = parse_value(&raw, as_json)?;

    let loc = vault_location(cli)?;
    let mut vault = SecretsVault::open(&loc.secrets_path, Some(&loc.master_key_path), loc.format)?;
    let existed = vault.get(key).is_some();
    vault.set(key, value)?;
    vault.save()?;

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!("Secret '{key}' {verb}"));

    Ok(())
}

/// Strings are stored verbatim unless `--json` asks for parsing.
fn parse_value(raw: &str, as_json: bool) -> Result<Value> {
    if as_json {
        serde_json::from_str(raw)
            .map_err(|e| VaultError::CommandFailed(format!("value is not valid JSON: {e}")))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_values_stay_strings() {
        assert_eq!(parse_value("42", false).unwrap(), json!("42"));
    }

    #[test]
    fn json_values_are_parsed() {
        assert_eq!(parse_value("42", true).unwrap(), json!(42));
        assert_eq!(
            parse_value(r#"{"a": [1, 2]}"#, true).unwrap(),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            parse_value("{nope", true),
            Err(VaultError::CommandFailed(_))
        ));
    }
}
