//! Domain Value Objects - Immutable domain concepts
//!
//! Value objects represent business concepts without identity.

pub mod transaction_category;

pub use transaction_category::TransactionCategory;
