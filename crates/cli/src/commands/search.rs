use crate::bootstrap;
use anyhow::{Context, Result};
use application::ChatOutcome;
use clap::Args;
use console::style;
use domain::ContextRepository;
use infrastructure::{FinchatConfig, JsonContextStore};
use memory::RetrievalError;

/// Rank a user's transactions against a query without generating an answer
#[derive(Debug, Args)]
pub struct SearchCommand {
    #[arg(short, long)]
    pub user: String,

    /// Number of results (defaults to retrieval.top_k)
    #[arg(short, long)]
    pub k: Option<usize>,

    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl SearchCommand {
    pub async fn execute(&self, config: &FinchatConfig) -> Result<()> {
        let store = JsonContextStore::new(config.data_file.clone());
        let Some(context) = store.get_context(&self.user).await? else {
            println!("{}", style(ChatOutcome::NoData.message()).yellow());
            return Ok(());
        };

        let mut config = config.clone();
        if let Some(k) = self.k {
            config.retrieval.top_k = k;
        }

        let api_key = bootstrap::api_key_from_env();
        let retriever = bootstrap::build_retriever(&config, api_key.as_deref())?;
        let query = self.query.join(" ");

        let retrieval = match retriever.retrieve(&context, &query).await {
            Ok(retrieval) => retrieval,
            Err(e) if e.is_no_data() => {
                println!("{}", style(ChatOutcome::NoData.message()).yellow());
                return Ok(());
            }
            Err(e) => {
                let what = describe(&e);
                return Err(e).context(what);
            }
        };

        for (rank, hit) in retrieval.results.iter().enumerate() {
            let tx = hit.transaction;
            println!(
                "{:>2}. {}  {}  {:>10.2}  {}",
                rank + 1,
                style(format!("{:.4}", hit.score)).cyan(),
                tx.date.format("%Y-%m-%d"),
                tx.amount,
                tx.description
            );
        }
        println!(
            "{}",
            style(format!(
                "{} of {} indexed transactions ({} dropped)",
                retrieval.results.len(),
                retrieval.index_size,
                retrieval.dropped
            ))
            .dim()
        );
        Ok(())
    }
}

fn describe(error: &RetrievalError) -> &'static str {
    match error {
        RetrievalError::Unavailable(_) => "Embedding provider unavailable",
        RetrievalError::DimensionMismatch { .. } => "Embedding dimensions are inconsistent",
        RetrievalError::DegenerateQuery => "Query could not be embedded",
        RetrievalError::EmptyInput | RetrievalError::NoData => "No transaction data",
    }
}
