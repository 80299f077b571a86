use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod hashing_embeddings;
pub mod openai_embeddings;
pub mod openai_provider;

pub use hashing_embeddings::{HashingEmbeddingProvider, DEFAULT_HASHING_DIMENSION};
pub use openai_embeddings::OpenAIEmbeddingProvider;
pub use openai_provider::OpenAIGenerationProvider;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4-turbo-preview";

/// Request object for generation providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_context: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(system_context: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_context: system_context.into(),
            user_message: user_message.into(),
            temperature: 0.5,
            max_output_tokens: 200,
        }
    }

    pub fn with_parameters(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Validate request before execution
    pub fn validate(&self) -> ProviderResult<()> {
        if self.user_message.trim().is_empty() {
            return Err(ProviderError::InvalidRequest(
                "user message cannot be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ProviderError::InvalidRequest(format!(
                "temperature {} outside [0, 2]",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(ProviderError::InvalidRequest(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response object from generation providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub model: String,
    pub response_time: Duration,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Provider identification
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderId {
    pub provider_type: String,
    pub model: String,
}

impl ProviderId {
    pub fn new(provider_type: &str, model: &str) -> Self {
        Self {
            provider_type: provider_type.to_string(),
            model: model.to_string(),
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.provider_type, self.model)
    }
}

/// Maps an ordered batch of strings to dense vectors.
///
/// The result has the same length and order as the input; a provider error
/// fails the whole batch.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn embed(&self, batch: &[String]) -> ProviderResult<Vec<Vec<f32>>>;
}

/// Produces free text from a system context and a user message
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn generate(&self, request: GenerationRequest) -> ProviderResult<GenerationResponse>;
}

/// Configuration for provider creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// `openai`, `local` / `ollama` for OpenAI-compatible servers, or
    /// `hashing` for the offline embedder
    pub provider_type: String,
    pub model: String,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    /// Vector size for the `hashing` embedder
    pub dimension: Option<usize>,
}

impl ProviderConfig {
    pub fn new(provider_type: &str, model: &str) -> Self {
        Self {
            provider_type: provider_type.to_string(),
            model: model.to_string(),
            api_key: None,
            endpoint: None,
            timeout: None,
            dimension: None,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    fn credentials(&self) -> ProviderResult<(String, Option<String>)> {
        match self.provider_type.as_str() {
            "openai" => {
                let key = self
                    .api_key
                    .clone()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        ProviderError::Configuration("OpenAI API key is not set".to_string())
                    })?;
                Ok((key, self.endpoint.clone()))
            }
            "local" | "ollama" => {
                let endpoint = self.endpoint.clone().ok_or_else(|| {
                    ProviderError::Configuration(format!(
                        "{} provider requires an endpoint",
                        self.provider_type
                    ))
                })?;
                Ok((self.api_key.clone().unwrap_or_default(), Some(endpoint)))
            }
            "hashing" => Err(ProviderError::Configuration(
                "hashing provider only supports embeddings".to_string(),
            )),
            other => Err(ProviderError::Configuration(format!(
                "Unknown provider type: {other}"
            ))),
        }
    }
}

/// Provider factory used by the process bootstrap
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_embedding_provider(
        config: &ProviderConfig,
    ) -> ProviderResult<Arc<dyn EmbeddingProvider>> {
        if config.provider_type == "hashing" {
            let dimension = config.dimension.unwrap_or(DEFAULT_HASHING_DIMENSION);
            return Ok(Arc::new(HashingEmbeddingProvider::new(dimension)?));
        }

        let (api_key, endpoint) = config.credentials()?;
        let mut provider = OpenAIEmbeddingProvider::new(api_key, config.model.clone(), endpoint)?;
        if let Some(timeout) = config.timeout {
            provider = provider.with_timeout(timeout)?;
        }
        Ok(Arc::new(provider))
    }

    pub fn create_generation_provider(
        config: &ProviderConfig,
    ) -> ProviderResult<Arc<dyn GenerationProvider>> {
        let (api_key, endpoint) = config.credentials()?;
        let mut provider =
            OpenAIGenerationProvider::new(api_key, config.model.clone(), endpoint)?;
        if let Some(timeout) = config.timeout {
            provider = provider.with_timeout(timeout)?;
        }
        Ok(Arc::new(provider))
    }
}
