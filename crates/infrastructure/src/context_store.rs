//! File-backed document store for user financial contexts
//!
//! Accepts either a map keyed by user id:
//!
//! ```json
//! { "user_123": { "transactions": [ ... ], "goals": [], "policies": [] } }
//! ```
//!
//! or a list of user documents carrying their own `clerk_id` (alias `user_id`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use domain::{ContextRepository, FinancialContext};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Deserialize)]
struct UserDocument {
    #[serde(alias = "user_id")]
    clerk_id: String,
    #[serde(flatten)]
    context: FinancialContext,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoreDocument {
    ByUser(HashMap<String, FinancialContext>),
    Users(Vec<UserDocument>),
}

impl StoreDocument {
    fn into_context(self, user_id: &str) -> Option<FinancialContext> {
        match self {
            StoreDocument::ByUser(mut users) => users.remove(user_id),
            StoreDocument::Users(users) => users
                .into_iter()
                .find(|doc| doc.clerk_id == user_id)
                .map(|doc| doc.context),
        }
    }
}

/// Reads the whole document on every lookup; nothing is cached
#[derive(Debug, Clone)]
pub struct JsonContextStore {
    path: PathBuf,
}

impl JsonContextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContextRepository for JsonContextStore {
    async fn get_context(&self, user_id: &str) -> Result<Option<FinancialContext>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read context store {}", self.path.display()))?;

        let document: StoreDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse context store {}", self.path.display()))?;

        let context = document.into_context(user_id);
        debug!(
            user_id,
            found = context.is_some(),
            transactions = context.as_ref().map_or(0, |c| c.transactions.len()),
            "Context lookup"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store_with(content: &str) -> (NamedTempFile, JsonContextStore) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let store = JsonContextStore::new(file.path());
        (file, store)
    }

    #[tokio::test]
    async fn test_map_document() {
        let (_file, store) = store_with(
            r#"{
                "user-1": {
                    "transactions": [
                        {"date": "2024-03-01T09:30:00Z", "description": "Coffee Shop", "amount": -4.5, "category": "Food & Drink"},
                        {"date": "2024-03-02T18:00:00Z", "description": "Gas Station", "amount": -40.0}
                    ]
                }
            }"#,
        );

        let context = store.get_context("user-1").await.unwrap().unwrap();
        assert_eq!(context.transactions.len(), 2);
        assert_eq!(context.transactions[0].description, "Coffee Shop");
        assert!(context.goals.is_empty());

        assert!(store.get_context("user-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_document_list() {
        let (_file, store) = store_with(
            r#"[
                {"clerk_id": "user_abc", "email": "a@example.com", "transactions": [
                    {"date": "2024-03-01T09:30:00Z", "description": "Salary Deposit", "amount": 2500.0}
                ], "goals": [{"name": "Vacation", "target_amount": 1000.0}]},
                {"user_id": "user_def", "transactions": []}
            ]"#,
        );

        let context = store.get_context("user_abc").await.unwrap().unwrap();
        assert_eq!(context.transactions[0].description, "Salary Deposit");
        assert_eq!(context.goals[0].name, "Vacation");

        let empty = store.get_context("user_def").await.unwrap().unwrap();
        assert!(!empty.has_transactions());
    }

    #[tokio::test]
    async fn test_documents_with_plain_and_naive_dates() {
        let (_file, store) = store_with(
            r#"[
                {"clerk_id": "u", "transactions": [
                    {"date": "2025-09-12", "description": "Coffee Shop", "amount": -6.5, "category": "Food & Drink"},
                    {"date": "2025-09-11T00:00:00", "description": "Gas Station", "amount": -40.0, "category": "Gas"}
                ], "policies": [{"description": "Limit Coffee Spending", "limit_amount": 50.0, "target_category": "Food & Drink"}]}
            ]"#,
        );

        let context = store.get_context("u").await.unwrap().unwrap();
        assert_eq!(context.transactions.len(), 2);
        assert_eq!(
            context.transactions[0].date.format("%Y-%m-%d %H:%M").to_string(),
            "2025-09-12 00:00"
        );
        assert_eq!(
            context.transactions[1].date.format("%Y-%m-%d %H:%M").to_string(),
            "2025-09-11 00:00"
        );
        assert_eq!(context.policies[0].timeframe, "monthly");
    }

    #[tokio::test]
    async fn test_reads_fresh_on_every_call() {
        let (mut file, store) = store_with(r#"{"u": {"transactions": []}}"#);
        assert!(!store.get_context("u").await.unwrap().unwrap().has_transactions());

        file.as_file_mut().set_len(0).unwrap();
        std::fs::write(
            file.path(),
            r#"{"u": {"transactions": [{"date": "2024-01-01T00:00:00Z", "description": "Rent", "amount": -900.0}]}}"#,
        )
        .unwrap();
        assert!(store.get_context("u").await.unwrap().unwrap().has_transactions());
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let store = JsonContextStore::new("/no/such/finchat.json");
        let err = store.get_context("u").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read context store"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let (_file, store) = store_with("{ not json");
        assert!(store.get_context("u").await.is_err());
    }
}
