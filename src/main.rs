use clap::Parser;
use secrets_vault::cli::{commands, output, Cli, Commands};
use secrets_vault::VaultError;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Get { ref key, output } => commands::get::execute(&cli, key.as_deref(), output),
        Commands::Set {
            ref key,
            ref value,
            json,
        } => commands::set::execute(&cli, key, value.as_deref(), json),
        Commands::Delete { ref key } => commands::delete::execute(&cli, key),
        Commands::Edit => commands::edit::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        if matches!(e, VaultError::MasterKeyNotFound(_)) {
            output::tip("Run `secrets-vault init` to create a new secrets file and key.");
        }
        std::process::exit(1);
    }
}

/// Log to stderr.  `RUST_LOG` wins; otherwise `--verbose` shows progress.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
