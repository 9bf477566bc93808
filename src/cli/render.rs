//! Rendering values for `secrets-vault get`.
//!
//! - `plain`: strings as-is, everything else as JSON
//! - `json`: pretty JSON
//! - `toml`: TOML (mappings only)
//! - `env`: `NAME=value` lines, nested keys joined with `_`

use std::fmt::Write;

use clap::ValueEnum;
use serde_json::Value;

use crate::errors::{Result, VaultError};
use crate::vault::{serialize, Format, SecretsDocument};

/// Output format for `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
    Toml,
    Env,
}

/// Render `value`, found at `key` (or the whole document when `None`).
pub fn render(key: Option<&str>, value: &Value, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Plain => match value {
            Value::String(s) => Ok(format!("{s}\n")),
            other => to_json(other),
        },
        OutputFormat::Json => to_json(value),
        OutputFormat::Toml => match value {
            Value::Object(map) => {
                let doc = SecretsDocument::from_map(map.clone());
                let bytes = serialize(&doc, Format::Toml)?;
                String::from_utf8(bytes).map_err(|e| VaultError::Serialization(e.to_string()))
            }
            _ => Err(VaultError::CommandFailed(
                "TOML output needs a mapping; use --output json or plain".into(),
            )),
        },
        OutputFormat::Env => {
            let mut vars = Vec::new();
            flatten_env(key.map(env_name).unwrap_or_default(), value, &mut vars);
            let mut out = String::new();
            for (name, value) in vars {
                let _ = writeln!(out, "{}", env_line(&name, &value));
            }
            Ok(out)
        }
    }
}

fn to_json(value: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| VaultError::Serialization(format!("JSON: {e}")))?;
    text.push('\n');
    Ok(text)
}

/// Collect `(NAME, value)` pairs from nested mappings and sequences.
fn flatten_env(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_env(join_env(&prefix, &env_name(key)), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_env(join_env(&prefix, &index.to_string()), child, out);
            }
        }
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Null => out.push((prefix, String::new())),
        other => out.push((prefix, other.to_string())),
    }
}

fn join_env(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}_{name}")
    }
}

/// `app.secret-key` -> `APP_SECRET_KEY`
fn env_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// One `.env` line, quoting values that need it.
fn env_line(name: &str, value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| matches!(c, ' ' | '#' | '"' | '\'' | '\n' | '$' | '\\'));
    if needs_quotes {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        format!("{name}=\"{escaped}\"")
    } else {
        format!("{name}={value}")
    }
}
