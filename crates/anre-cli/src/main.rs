//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via
//! bootstrap. Command dispatch routes to handlers.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use anre_cli::{Cli, CliConfig, CliContext, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn context(cli: &Cli) -> Result<CliContext, CliError> {
    bootstrap(CliConfig::from_cli(cli)?)
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    let Some(command) = cli.command.take() else {
        // No command provided - show help
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Core(e.to_string()))?;
        return Ok(());
    };

    match command {
        Commands::Start { json } => handlers::start::execute(&context(&cli)?, json).await,
        Commands::Check => handlers::check::execute(&context(&cli)?).await,
        Commands::Paths => {
            handlers::paths::execute(&context(&cli)?);
            Ok(())
        }
        // Ping and login talk to an already running server
        Commands::Ping { port } => handlers::ping::execute(port).await,
        Commands::Login { port, method } => handlers::login::execute(port, method).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads ANRE_* overrides
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
