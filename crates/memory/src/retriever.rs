use crate::errors::RetrievalError;
use crate::vector_index::{RetrievalResult, VectorIndex};
use common::OperationTimer;
use domain::{EmbeddingVector, FinancialContext};
use llm::{EmbeddingProvider, ProviderError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Retrieval tuning
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieverConfig {
    pub top_k: usize,
    /// Applies to the batch and the query embedding separately
    pub embedding_timeout: Duration,
    /// Pin the index dimension instead of taking it from the first vector
    pub expected_dimension: Option<usize>,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            embedding_timeout: Duration::from_secs(30),
            expected_dimension: None,
        }
    }
}

/// Outcome of one retrieval
#[derive(Debug)]
pub struct Retrieval<'a> {
    pub results: RetrievalResult<'a>,
    /// Vectors that made it into the index
    pub index_size: usize,
    /// Transactions dropped for degenerate embeddings
    pub dropped: usize,
}

/// Builds a per-request index over a user's transactions and ranks them
/// against a question.
#[derive(Clone)]
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: RetrieverConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    pub async fn retrieve<'a>(
        &self,
        context: &'a FinancialContext,
        query: &str,
    ) -> Result<Retrieval<'a>, RetrievalError> {
        if context.indexable_count() == 0 {
            debug!("No indexable transactions, skipping embedding");
            return Err(RetrievalError::NoData);
        }

        let mut timer = OperationTimer::new("retrieval");
        timer.add_field("transactions", context.indexable_count());
        timer.add_field("top_k", self.config.top_k);

        let result = self.run(context, query).await;
        timer.finish_with_result(&result);
        result
    }

    async fn run<'a>(
        &self,
        context: &'a FinancialContext,
        query: &str,
    ) -> Result<Retrieval<'a>, RetrievalError> {
        let provider = self.provider.as_ref();
        let query_batch = [query.to_string()];

        let build = VectorIndex::build(
            context.indexable_transactions(),
            provider,
            self.config.expected_dimension,
        );
        let embed_query = async {
            provider
                .embed(&query_batch)
                .await
                .map_err(RetrievalError::from)
        };

        let (index, query_raw) = tokio::try_join!(
            self.with_timeout(build),
            self.with_timeout(embed_query)
        )
        .map_err(|e| match e {
            RetrievalError::EmptyInput => RetrievalError::NoData,
            other => other,
        })?;

        let query_vector = Self::query_vector(query_raw, index.dimension())?;
        let results = index.search(&query_vector, self.config.top_k)?;

        info!(
            index_size = index.len(),
            dropped = index.dropped(),
            results = results.len(),
            "Retrieved transactions"
        );

        Ok(Retrieval {
            results,
            index_size: index.len(),
            dropped: index.dropped(),
        })
    }

    /// Bound an embedding step by the configured timeout
    async fn with_timeout<T, F>(&self, step: F) -> Result<T, RetrievalError>
    where
        F: Future<Output = Result<T, RetrievalError>>,
    {
        let limit = self.config.embedding_timeout;
        match timeout(limit, step).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(limit).into()),
        }
    }

    fn query_vector(
        mut raw: Vec<Vec<f32>>,
        dimension: usize,
    ) -> Result<EmbeddingVector, RetrievalError> {
        if raw.len() != 1 {
            return Err(ProviderError::LengthMismatch {
                expected: 1,
                actual: raw.len(),
            }
            .into());
        }
        let components = raw.remove(0);
        let actual = components.len();

        let vector = EmbeddingVector::from_raw(components, dimension).map_err(|_| {
            RetrievalError::DimensionMismatch {
                expected: dimension,
                actual,
            }
        })?;
        vector
            .normalized()
            .map_err(|_| RetrievalError::DegenerateQuery)
    }
}
