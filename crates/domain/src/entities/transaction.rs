//! Transaction - a single booked movement on a user's account

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::TransactionCategory;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A financial transaction as stored in the user's document.
///
/// Immutable for the duration of a retrieval request; the retrieval
/// pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "new_transaction_id")]
    pub transaction_id: String,
    /// RFC 3339, naive datetime (UTC) or plain date (midnight UTC)
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    pub description: String,
    /// Signed amount: negative for spending, positive for income
    pub amount: f64,
    #[serde(default)]
    pub category: Option<TransactionCategory>,
    #[serde(default)]
    pub merchant: Option<String>,
}

fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unrecognized transaction date: {raw:?}"))
    })
}

/// Accepts the date shapes found in stored user documents
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl Transaction {
    /// Create a transaction dated now with a fresh id
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            transaction_id: new_transaction_id(),
            date: Utc::now(),
            description: description.into(),
            amount,
            category: None,
            merchant: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_category(mut self, category: TransactionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Only transactions with a non-blank description can be embedded
    pub fn is_indexable(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Business validation used by ingestion adapters
    pub fn validate(&self) -> DomainResult<()> {
        if !self.is_indexable() {
            return Err(DomainError::EmptyDescription);
        }
        Ok(())
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}
