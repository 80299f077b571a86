use super::{
    GenerationProvider, GenerationRequest, GenerationResponse, ProviderId, TokenUsage,
    DEFAULT_OPENAI_ENDPOINT,
};
use crate::errors::{ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completions client for OpenAI and OpenAI-compatible servers
#[derive(Debug, Clone)]
pub struct OpenAIGenerationProvider {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl OpenAIGenerationProvider {
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

    pub fn model(&self) -> &str {
        &self.model
    }
}

pub(crate) fn build_client(timeout: Duration) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Configuration(format!("Failed to create HTTP client: {e}")))
}

#[async_trait]
impl GenerationProvider for OpenAIGenerationProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("openai", &self.model)
    }

    async fn generate(&self, request: GenerationRequest) -> ProviderResult<GenerationResponse> {
        let start_time = Instant::now();

        request.validate()?;

        let openai_request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: request.system_context.clone(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: request.user_message.clone(),
                },
            ],
            max_tokens: Some(request.max_output_tokens),
            temperature: Some(request.temperature),
        };

        info!(model = %self.model, "Sending chat completion request");
        debug!("User message: {}", request.user_message);

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .header("Content-Type", "application/json")
            .json(&openai_request);
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
            error!("Chat completion API error {}: {}", status, error_text);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;
        let elapsed = start_time.elapsed();

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("response contained no choices".to_string())
        })?;

        let usage = openai_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        info!(
            model = %self.model,
            duration_ms = elapsed.as_millis() as u64,
            "Received chat completion"
        );

        Ok(GenerationResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: self.model.clone(),
            response_time: elapsed,
        })
    }
}

// OpenAI-specific request/response types
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
