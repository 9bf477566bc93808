//! Vault module: the encrypted secrets document.
//!
//! This module provides:
//! - The in-memory `SecretsDocument` with dotted-path access (`document`)
//! - JSON and comment-preserving TOML formats (`format`)
//! - The external editor workflow (`editor`)
//! - High-level `SecretsVault` for creating, opening and saving (`store`)

pub mod document;
pub mod editor;
pub mod format;
pub mod store;
mod toml_layout;

// Re-export the most commonly used items.
pub use document::SecretsDocument;
pub use editor::EditorCommand;
pub use format::{deserialize, serialize, Format};
pub use store::{EditOutcome, SecretsVault};
