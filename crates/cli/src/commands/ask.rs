use crate::bootstrap;
use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use infrastructure::FinchatConfig;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Args)]
pub struct AskCommand {
    /// User whose transactions ground the answer
    #[arg(short, long)]
    pub user: String,

    /// Question in natural language
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskCommand {
    pub async fn execute(&self, config: &FinchatConfig) -> Result<()> {
        let api_key = bootstrap::api_key_from_env();
        let chat = bootstrap::build_chat_service(config, api_key.as_deref())?;
        let question = self.question.join(" ");

        info!(user_id = %self.user, "Answering question");

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Looking through your transactions...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let outcome = chat.respond(&self.user, &question).await;
        spinner.finish_and_clear();

        if outcome.is_responded() {
            println!("{}", outcome.message());
        } else {
            println!("{}", style(outcome.message()).yellow());
        }
        Ok(())
    }
}
