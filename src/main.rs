//! toolgate - main entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolgate::cli::{Cli, Command, run_invoke_command, run_tools_command, run_validate_command};

/// Initialize tracing (warn level unless RUST_LOG says otherwise).
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    match cli.command {
        Command::Tools { scope, verbose } => run_tools_command(scope, verbose).await,
        Command::Invoke {
            tool,
            params,
            credentials,
            scope,
        } => run_invoke_command(tool, params, credentials, scope).await,
        Command::Validate {
            provider,
            credentials,
        } => run_validate_command(provider, credentials).await,
    }
}
