//! Remote model providers used by the retrieval pipeline.
//!
//! Two capabilities are exposed as traits so callers receive them by
//! injection instead of reaching for a global client:
//!
//! - [`EmbeddingProvider`]: batch of strings -> batch of dense vectors
//! - [`GenerationProvider`]: system context + user message -> text

mod errors;
pub mod providers;

pub use errors::{ProviderError, ProviderResult};
pub use providers::*;
