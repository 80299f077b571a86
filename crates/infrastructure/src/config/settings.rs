use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "finchat_data.json";

/// Top-level configuration for the FinChat pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinchatConfig {
    pub embedding: EmbeddingSettings,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalSettings,
    pub logging: LoggingSettings,
    /// JSON document holding every user's financial context
    pub data_file: PathBuf,
}

impl Default for FinchatConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingSettings::default(),
            generation: GenerationConfig::default(),
            retrieval: RetrievalSettings::default(),
            logging: LoggingSettings::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// `openai`, `local` or `ollama`
    pub provider: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    /// Reject vectors whose length differs from this
    pub dimension: Option<usize>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            endpoint: None,
            timeout_secs: 30,
            dimension: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    /// Add amount, date and category to each prompt line
    pub include_details: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            endpoint: None,
            temperature: 0.5,
            max_output_tokens: 200,
            timeout_secs: 60,
            include_details: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
