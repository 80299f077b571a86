//! Wires configuration into providers and services

use anyhow::{Context, Result};
use application::{ChatService, GenerationSettings, PromptComposer};
use infrastructure::{FinchatConfig, JsonContextStore};
use llm::{ProviderConfig, ProviderFactory};
use memory::{Retriever, RetrieverConfig};
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty())
}

pub fn embedding_provider_config(config: &FinchatConfig, api_key: Option<&str>) -> ProviderConfig {
    let settings = &config.embedding;
    let provider_config = provider_config(
        &settings.provider,
        &settings.model,
        settings.endpoint.as_deref(),
        settings.timeout_secs,
        api_key,
    );
    match settings.dimension {
        Some(dimension) => provider_config.with_dimension(dimension),
        None => provider_config,
    }
}

pub fn generation_provider_config(config: &FinchatConfig, api_key: Option<&str>) -> ProviderConfig {
    let settings = &config.generation;
    provider_config(
        &settings.provider,
        &settings.model,
        settings.endpoint.as_deref(),
        settings.timeout_secs,
        api_key,
    )
}

fn provider_config(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
    timeout_secs: u64,
    api_key: Option<&str>,
) -> ProviderConfig {
    let mut provider_config =
        ProviderConfig::new(provider, model).with_timeout(Duration::from_secs(timeout_secs));
    if let Some(key) = api_key {
        provider_config = provider_config.with_api_key(key.to_string());
    }
    if let Some(endpoint) = endpoint {
        provider_config = provider_config.with_endpoint(endpoint.to_string());
    }
    provider_config
}

pub fn retriever_config(config: &FinchatConfig) -> RetrieverConfig {
    RetrieverConfig {
        top_k: config.retrieval.top_k,
        embedding_timeout: Duration::from_secs(config.embedding.timeout_secs),
        expected_dimension: config.embedding.dimension,
    }
}

pub fn generation_settings(config: &FinchatConfig) -> GenerationSettings {
    GenerationSettings {
        temperature: config.generation.temperature,
        max_output_tokens: config.generation.max_output_tokens,
        timeout: Duration::from_secs(config.generation.timeout_secs),
    }
}

pub fn build_retriever(config: &FinchatConfig, api_key: Option<&str>) -> Result<Retriever> {
    let provider = ProviderFactory::create_embedding_provider(&embedding_provider_config(
        config, api_key,
    ))
    .context("Failed to create embedding provider")?;
    Ok(Retriever::new(provider, retriever_config(config)))
}

pub fn build_chat_service(config: &FinchatConfig, api_key: Option<&str>) -> Result<ChatService> {
    let retriever = build_retriever(config, api_key)?;
    let generator = ProviderFactory::create_generation_provider(&generation_provider_config(
        config, api_key,
    ))
    .context("Failed to create generation provider")?;
    let contexts = Arc::new(JsonContextStore::new(config.data_file.clone()));

    Ok(ChatService::new(
        contexts,
        retriever,
        generator,
        generation_settings(config),
    )
    .with_composer(PromptComposer::new().with_details(config.generation.include_details)))
}
