use llm::ProviderError;
use thiserror::Error;

/// Why a retrieval produced no ranking
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    /// Nothing to index: no transactions, or none with a usable description
    #[error("No embeddable transactions")]
    EmptyInput,

    /// The user has no transaction history at all
    #[error("No transaction data available")]
    NoData,

    /// The embedding provider failed, timed out or broke its contract
    #[error("Embedding provider unavailable: {0}")]
    Unavailable(#[from] ProviderError),

    /// Vectors of different dimensions cannot share an index
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The query embedded to a zero vector and cannot be compared
    #[error("Query embedding is degenerate")]
    DegenerateQuery,
}

impl RetrievalError {
    /// Both "no data" flavours end in the same user-facing outcome
    pub fn is_no_data(&self) -> bool {
        matches!(self, RetrievalError::EmptyInput | RetrievalError::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_provider_error_conversion() {
        let err: RetrievalError = ProviderError::Timeout(Duration::from_secs(1)).into();
        assert!(matches!(err, RetrievalError::Unavailable(ProviderError::Timeout(_))));
        assert!(!err.is_no_data());
    }

    #[test]
    fn test_no_data_classification() {
        assert!(RetrievalError::EmptyInput.is_no_data());
        assert!(RetrievalError::NoData.is_no_data());
        assert!(!RetrievalError::DegenerateQuery.is_no_data());
    }
}
