use super::{EmbeddingProvider, ProviderId};
use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

pub const DEFAULT_HASHING_DIMENSION: usize = 256;

/// Offline embedder: hashed bag of lowercase word tokens.
///
/// Texts sharing a word always have positive similarity. Text without any
/// word characters embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimension: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimension: usize) -> ProviderResult<Self> {
        if dimension == 0 {
            return Err(ProviderError::Configuration(
                "hashing dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(prefix) % self.dimension as u64) as usize
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[self.bucket(&token.to_lowercase())] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("hashing", &format!("hashing-{}", self.dimension))
    }

    async fn embed(&self, batch: &[String]) -> ProviderResult<Vec<Vec<f32>>> {
        if batch.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "embedding batch cannot be empty".to_string(),
            ));
        }
        Ok(batch.iter().map(|text| self.embed_text(text)).collect())
    }
}
