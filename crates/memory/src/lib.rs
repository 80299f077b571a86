//! Request-scoped semantic retrieval over a user's transactions.
//!
//! ```text
//! transactions -> EmbeddingProvider -> normalize -> VectorIndex
//!                                                      |
//! query --------> EmbeddingProvider -> normalize -> search(top_k)
//! ```
//!
//! Nothing here outlives a request: the index borrows the transactions and
//! is dropped with the [`Retrieval`] that came out of it.

mod errors;
mod retriever;
mod vector_index;

pub use errors::RetrievalError;
pub use retriever::{Retrieval, Retriever, RetrieverConfig};
pub use vector_index::{RetrievalResult, ScoredTransaction, VectorIndex};
