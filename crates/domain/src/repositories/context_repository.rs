//! ContextRepository - Domain abstraction over the user document store

use crate::entities::FinancialContext;
use async_trait::async_trait;

/// Read access to a user's financial context.
///
/// Persistence is owned by the store; the retrieval pipeline only reads.
#[async_trait]
pub trait ContextRepository: Send + Sync {
    /// Load the context for `user_id`, `Ok(None)` when the user is unknown
    async fn get_context(&self, user_id: &str) -> anyhow::Result<Option<FinancialContext>>;
}
