//! Domain Entities - Core business objects
//!
//! Entities carry identity and business rules.
//! Independent of infrastructure concerns.

mod embedding_vector;
mod financial_context;
mod transaction;

pub use embedding_vector::{EmbeddingVector, NORM_TOLERANCE};
pub use financial_context::{FinancialContext, Goal, Policy};
pub use transaction::Transaction;
