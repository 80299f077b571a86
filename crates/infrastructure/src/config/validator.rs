use super::settings::FinchatConfig;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid environment override: {0}")]
    Environment(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &FinchatConfig) -> Result<(), ConfigError> {
        if config.retrieval.top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k must be greater than 0".to_string(),
            ));
        }

        let temperature = config.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid(format!(
                "generation.temperature must be between 0.0 and 2.0, got {temperature}"
            )));
        }

        if config.generation.max_output_tokens == 0 {
            return Err(ConfigError::Invalid(
                "generation.max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if config.embedding.timeout_secs == 0 || config.generation.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than 0 seconds".to_string(),
            ));
        }

        if config.embedding.dimension == Some(0) {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be greater than 0".to_string(),
            ));
        }

        for (section, model) in [
            ("embedding", &config.embedding.model),
            ("generation", &config.generation.model),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{section}.model cannot be empty")));
            }
        }

        Ok(())
    }
}
