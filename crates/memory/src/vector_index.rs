use crate::errors::RetrievalError;
use domain::{EmbeddingVector, Transaction};
use llm::{EmbeddingProvider, ProviderError};
use tracing::{debug, warn};

/// One ranked hit from [`VectorIndex::search`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTransaction<'a> {
    pub transaction: &'a Transaction,
    /// Cosine similarity in `[-1, 1]`
    pub score: f32,
}

/// Hits ordered by descending score
pub type RetrievalResult<'a> = Vec<ScoredTransaction<'a>>;

/// Flat in-memory index of normalized transaction embeddings.
///
/// Vectors and transactions are parallel arrays in insertion order. The index
/// is built once per request and never mutated afterwards.
#[derive(Debug)]
pub struct VectorIndex<'a> {
    vectors: Vec<EmbeddingVector>,
    transactions: Vec<&'a Transaction>,
    dimension: usize,
    dropped: usize,
}

impl<'a> VectorIndex<'a> {
    /// Embed every indexable description in one provider call and index the result
    pub async fn build<I>(
        transactions: I,
        embedder: &dyn EmbeddingProvider,
        expected_dimension: Option<usize>,
    ) -> Result<Self, RetrievalError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let indexable: Vec<&'a Transaction> = transactions
            .into_iter()
            .filter(|t| t.is_indexable())
            .collect();
        if indexable.is_empty() {
            return Err(RetrievalError::EmptyInput);
        }

        let batch: Vec<String> = indexable.iter().map(|t| t.description.clone()).collect();
        debug!(batch_size = batch.len(), provider = %embedder.id(), "Embedding transaction batch");
        let raw = embedder.embed(&batch).await?;

        Self::from_embeddings(indexable, raw, expected_dimension)
    }

    /// Index vectors that were already fetched for `transactions`.
    ///
    /// `raw[i]` belongs to `transactions[i]`. The index dimension is
    /// `expected_dimension` when given, otherwise the first vector's length.
    pub fn from_embeddings(
        transactions: Vec<&'a Transaction>,
        raw: Vec<Vec<f32>>,
        expected_dimension: Option<usize>,
    ) -> Result<Self, RetrievalError> {
        if raw.len() != transactions.len() {
            return Err(ProviderError::LengthMismatch {
                expected: transactions.len(),
                actual: raw.len(),
            }
            .into());
        }
        if transactions.is_empty() {
            return Err(RetrievalError::EmptyInput);
        }

        let dimension = match expected_dimension {
            Some(d) => d,
            None => raw.first().map(Vec::len).unwrap_or_default(),
        };
        if dimension == 0 {
            return Err(ProviderError::MalformedResponse(
                "embedding vectors have zero dimensions".to_string(),
            )
            .into());
        }

        let mut vectors = Vec::with_capacity(raw.len());
        let mut kept = Vec::with_capacity(raw.len());
        let mut dropped = 0;

        for (transaction, components) in transactions.into_iter().zip(raw) {
            if components.len() != dimension {
                return Err(RetrievalError::DimensionMismatch {
                    expected: dimension,
                    actual: components.len(),
                });
            }

            let normalized = EmbeddingVector::from_raw(components, dimension)
                .and_then(|v| v.normalized());
            match normalized {
                Ok(vector) => {
                    vectors.push(vector);
                    kept.push(transaction);
                }
                Err(e) => {
                    warn!(
                        transaction_id = %transaction.transaction_id,
                        error = %e,
                        "Dropping transaction with degenerate embedding"
                    );
                    dropped += 1;
                }
            }
        }

        if vectors.is_empty() {
            warn!(dropped, "Every transaction embedding was degenerate");
            return Err(RetrievalError::EmptyInput);
        }

        debug!(size = vectors.len(), dimension, dropped, "Vector index built");

        Ok(Self {
            vectors,
            transactions: kept,
            dimension,
            dropped,
        })
    }

    /// Top `k` transactions by similarity to a normalized query.
    ///
    /// Ties keep insertion order. `k == 0` yields nothing and `k > len()`
    /// yields everything.
    pub fn search(
        &self,
        query: &EmbeddingVector,
        k: usize,
    ) -> Result<RetrievalResult<'a>, RetrievalError> {
        let actual = query.dimensions().len();
        if actual != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored = Vec::with_capacity(self.vectors.len());
        for (vector, transaction) in self.vectors.iter().zip(&self.transactions) {
            let score = vector.dot(query).map_err(|_| RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual,
            })?;
            scored.push(ScoredTransaction {
                transaction: *transaction,
                score: score.clamp(-1.0, 1.0),
            });
        }

        // sort_by is stable, so equal scores stay in insertion order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k.min(self.vectors.len()));

        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Transactions left out because their embedding had zero norm
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Stored unit vectors in insertion order
    pub fn vectors(&self) -> &[EmbeddingVector] {
        &self.vectors
    }
}
