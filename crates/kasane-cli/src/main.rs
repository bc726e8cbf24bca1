use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kasane_infrastructure::ConfigService;
use kasane_infrastructure::logging::init_stderr_logging;

mod commands;

#[derive(Parser)]
#[command(name = "kasane")]
#[command(about = "Kasane CLI - compose and execute administrative commands", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/kasane/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the command registry as JSON
    Schema,
    /// Log in, execute a batch of commands and print the result
    Run(commands::run::RunArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new_default()?,
    };
    let config = service.load()?;
    init_stderr_logging(&config.log_level);

    match cli.command {
        Commands::Schema => commands::schema::print()?,
        Commands::Run(args) => commands::run::run(args, &config).await?,
    }

    Ok(())
}
