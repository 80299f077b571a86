//! Domain Errors - Business rule violations
//!
//! Contains ONLY business logic errors, not infrastructure errors

use thiserror::Error;

/// Domain-specific errors representing business rule violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Business validation: transaction description cannot be empty
    #[error("Transaction description cannot be empty")]
    EmptyDescription,

    /// Business rule: embedding dimension mismatch
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimensionMismatch { expected: usize, actual: usize },

    /// Business rule: a zero-norm vector cannot be normalized
    #[error("Degenerate embedding vector: {0}")]
    DegenerateVector(String),

    /// Business validation: invalid embedding vector
    #[error("Invalid embedding vector: {0}")]
    InvalidEmbeddingVector(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Check if error is a business validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyDescription | DomainError::InvalidEmbeddingVector(_)
        )
    }

    /// Degenerate vectors are excluded from search instead of failing the request
    pub fn is_degenerate(&self) -> bool {
        matches!(self, DomainError::DegenerateVector(_))
    }
}
