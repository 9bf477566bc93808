pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use errors::{Result, VaultError};
pub use vault::{EditOutcome, EditorCommand, Format, SecretsDocument, SecretsVault};
