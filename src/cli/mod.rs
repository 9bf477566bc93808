//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;
pub mod render;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::Settings;
use crate::errors::Result;
use crate::vault::Format;

pub use render::OutputFormat;

/// secrets-vault CLI: encrypted secrets file manager.
#[derive(Parser)]
#[command(
    name = "secrets-vault",
    about = "Encrypted secrets file manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Encrypted secrets file (default: secrets.toml.enc)
    #[arg(short, long, global = true)]
    pub secrets_file: Option<PathBuf>,

    /// File holding the master key when MASTER_KEY is unset (default: master.key)
    #[arg(short, long, global = true)]
    pub master_key_file: Option<PathBuf>,

    /// Document format: json or toml (default: inferred from the file name)
    #[arg(short, long, global = true)]
    pub format: Option<Format>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new secrets file and master key
    Init,

    /// Print a secret, or the whole document when KEY is omitted
    Get {
        /// Dotted path (e.g. app.secret-key)
        key: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
        output: OutputFormat,
    },

    /// Set a secret (add or update)
    Set {
        /// Dotted path (e.g. app.secret-key)
        key: String,

        /// Secret value (read from stdin when omitted)
        value: Option<String>,

        /// Parse VALUE as JSON instead of storing it as a string
        #[arg(long)]
        json: bool,
    },

    /// Delete a secret
    Delete {
        /// Dotted path (e.g. app.secret-key)
        key: String,
    },

    /// Open the decrypted secrets in $EDITOR and re-encrypt on save
    Edit,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Where the vault lives, after merging CLI flags over project settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLocation {
    pub secrets_path: PathBuf,
    pub master_key_path: PathBuf,
    pub format: Format,
}

/// Resolve paths and format for the current working directory.
pub fn vault_location(cli: &Cli) -> Result<VaultLocation> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    Ok(resolve_location(cli, &settings, &cwd))
}

/// Flags win over settings.  Without `--format`, a format named in the
/// secrets file name wins over the configured one.
fn resolve_location(cli: &Cli, settings: &Settings, project_dir: &Path) -> VaultLocation {
    let secrets_path = match &cli.secrets_file {
        Some(path) => project_dir.join(path),
        None => settings.secrets_path(project_dir),
    };
    let master_key_path = match &cli.master_key_file {
        Some(path) => project_dir.join(path),
        None => settings.master_key_path(project_dir),
    };
    let format = cli
        .format
        .or_else(|| Format::infer(&secrets_path))
        .unwrap_or_else(|| settings.format());

    VaultLocation {
        secrets_path,
        master_key_path,
        format,
    }
}
