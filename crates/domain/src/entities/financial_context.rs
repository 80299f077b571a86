//! FinancialContext - everything the assistant knows about one user

use super::Transaction;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
}

/// A spending policy, e.g. "Limit Coffee Spending"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default = "new_policy_id")]
    pub policy_id: String,
    pub description: String,
    pub limit_amount: f64,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    pub target_category: String,
    #[serde(default)]
    pub current_spending: f64,
}

fn new_policy_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_timeframe() -> String {
    "monthly".to_string()
}

/// Read-only aggregate supplied by the document store.
///
/// Goals and policies travel with the context but play no part in retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialContext {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl FinancialContext {
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    pub fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }

    /// Transactions that can be embedded, in their original order
    pub fn indexable_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_indexable())
    }

    pub fn indexable_count(&self) -> usize {
        self.indexable_transactions().count()
    }
}
