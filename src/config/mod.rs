//! Configuration: the project settings file and environment variable names.

pub mod settings;

pub use settings::Settings;

/// Environment variable that overrides the master key file.
pub const MASTER_KEY_ENV: &str = "MASTER_KEY";

/// Environment variable holding the editor command for `edit`.
pub const EDITOR_ENV: &str = "EDITOR";
