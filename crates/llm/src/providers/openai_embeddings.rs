use super::openai_provider::build_client;
use super::{EmbeddingProvider, ProviderId, DEFAULT_OPENAI_ENDPOINT};
use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `/embeddings` client for OpenAI and OpenAI-compatible servers.
///
/// One HTTP request per call regardless of batch size.
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingProvider {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl OpenAIEmbeddingProvider {
    pub fn new(api_key: String, model: String, endpoint: Option<String>) -> ProviderResult<Self> {
        if api_key.is_empty() && endpoint.is_none() {
            return Err(ProviderError::Configuration(
                "OpenAI API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: build_client(DEFAULT_TIMEOUT)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> ProviderResult<Self> {
        self.timeout = timeout;
        self.client = build_client(timeout)?;
        Ok(self)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("openai", &self.model)
    }

    async fn embed(&self, batch: &[String]) -> ProviderResult<Vec<Vec<f32>>> {
        if batch.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "embedding batch cannot be empty".to_string(),
            ));
        }

        let start_time = Instant::now();
        let request = EmbeddingRequest {
            model: &self.model,
            input: batch,
        };

        debug!(model = %self.model, batch_size = batch.len(), "Sending embedding request");

        let mut builder = self
            .client
            .post(format!("{}/embeddings", self.endpoint))
            .header("Content-Type", "application/json")
            .json(&request);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!("Embedding API error {}: {}", status, error_text);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        let vectors = order_by_index(body.data, batch.len())?;

        info!(
            model = %self.model,
            batch_size = batch.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Received embeddings"
        );

        Ok(vectors)
    }
}

/// Restore input order from the `index` field and check the batch is whole
fn order_by_index(mut data: Vec<EmbeddingData>, expected: usize) -> ProviderResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(ProviderError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }

    data.sort_by_key(|item| item.index);
    if data.iter().enumerate().any(|(i, item)| item.index != i) {
        return Err(ProviderError::MalformedResponse(
            "embedding indices are not a permutation of the input".to_string(),
        ));
    }

    Ok(data.into_iter().map(|item| item.embedding).collect())
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
