//! One module per subcommand, each exposing an `execute` function.

pub mod completions;
pub mod delete;
pub mod edit;
pub mod get;
pub mod init;
pub mod set;
