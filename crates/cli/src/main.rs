use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::{init_structured_logging, LoggingConfig};
use infrastructure::ConfigLoader;
use std::path::PathBuf;

mod bootstrap;
mod commands;

use commands::{AskCommand, ConfigCommand, SearchCommand};

#[derive(Parser)]
#[command(name = "finchat")]
#[command(about = "FinChat - ask questions about your own transactions")]
#[command(version)]
struct Cli {
    /// Configuration file (otherwise finchat.toml, .finchatrc.toml, ~/.config/finchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON document with user financial contexts
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question grounded in the user's transactions
    Ask(AskCommand),
    /// Show the transactions most relevant to a query
    Search(SearchCommand),
    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path.clone());
    }
    let mut config = loader.load().await.context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }

    init_structured_logging(
        LoggingConfig::default()
            .with_level_str(&config.logging.level)
            .with_json(cli.json_logs || config.logging.json),
    )?;

    match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Config(cmd) => cmd.execute(&config).await,
    }
}
