use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use infrastructure::{ConfigLoader, FinchatConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Write an example configuration file
    Init {
        #[arg(short, long, default_value = "finchat.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the resolved configuration
    Show {
        /// JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

impl ConfigCommand {
    pub async fn execute(&self, config: &FinchatConfig) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Init { output, force } => init_config(output, *force).await,
            ConfigSubcommand::Show { json } => show_config(config, *json),
        }
    }
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite",
            output.display()
        );
    }

    let content = ConfigLoader::generate_example_config()?;
    tokio::fs::write(output, content)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Configuration written to: {}", output.display());
    println!("Wrote {}", output.display());
    Ok(())
}

fn show_config(config: &FinchatConfig, json: bool) -> Result<()> {
    let rendered = if json {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };
    println!("{rendered}");
    Ok(())
}
