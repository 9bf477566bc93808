//! Document formats: how a `SecretsDocument` looks once decrypted.
//!
//! - **Json**: four-space indented JSON, key order preserved.
//! - **Toml**: comment-preserving TOML (see `toml_layout`).
//!
//! `serialize` and `deserialize` are pure: the same document always
//! renders to the same bytes, which is what the edit workflow relies on
//! to detect "no changes".

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use super::document::SecretsDocument;
use super::toml_layout;
use crate::errors::{Result, VaultError};

/// Indentation used for JSON documents.
const JSON_INDENT: &[u8] = b"    ";

/// Bundled example documents used when a vault is created.
const EXAMPLE_TOML: &str = include_str!("templates/example.toml");
const EXAMPLE_JSON: &str = include_str!("templates/example.json");

/// The textual format of a decrypted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    #[default]
    Toml,
}

impl Format {
    /// File extension for temp files and secrets file names.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Guess the format from a file name like `secrets.json.enc`.
    ///
    /// Looks at every dot-separated part of the name, so both
    /// `secrets.json` and `secrets.json.enc` are recognised.
    pub fn infer(path: &Path) -> Option<Format> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        name.split('.').skip(1).find_map(|part| part.parse().ok())
    }

    /// The bundled example document for this format.
    pub fn example(self) -> &'static str {
        match self {
            Format::Json => EXAMPLE_JSON,
            Format::Toml => EXAMPLE_TOML,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            other => Err(VaultError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render `doc` in `format`.
pub fn serialize(doc: &SecretsDocument, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(JSON_INDENT);
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            doc.as_map()
                .serialize(&mut ser)
                .map_err(|e| VaultError::Serialization(format!("JSON: {e}")))?;
            buf.push(b'\n');
            Ok(buf)
        }
        Format::Toml => toml_layout::render(doc).map(String::into_bytes),
    }
}

/// Parse `bytes` in `format`.
///
/// Empty (or whitespace-only) input is an empty document.
pub fn deserialize(bytes: &[u8], format: Format) -> Result<SecretsDocument> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| VaultError::MalformedDocument(format!("not valid UTF-8: {e}")))?;

    match format {
        Format::Json => {
            if text.trim().is_empty() {
                return Ok(SecretsDocument::new());
            }
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Ok(SecretsDocument::from_map(map)),
                Ok(_) => Err(VaultError::MalformedDocument(
                    "the top level of the document must be a mapping".into(),
                )),
                Err(e) => Err(VaultError::MalformedDocument(e.to_string())),
            }
        }
        Format::Toml => toml_layout::parse(text),
    }
}
