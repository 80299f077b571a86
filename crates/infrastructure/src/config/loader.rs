use super::settings::FinchatConfig;
use super::validator::{ConfigError, ConfigValidator};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Where the file layer of a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

/// Environment variables that may override file settings
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    top_k: Option<usize>,
    embedding_model: Option<String>,
    generation_model: Option<String>,
    openai_endpoint: Option<String>,
    log_level: Option<String>,
    data_file: Option<PathBuf>,
}

/// Layers defaults, the first config file found and `FINCHAT_*` overrides
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    config_paths: Vec<PathBuf>,
    env_prefix: String,
    env_vars: Option<Vec<(String, String)>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            config_paths: Self::default_config_paths(),
            env_prefix: "FINCHAT_".to_string(),
            env_vars: None,
        }
    }

    /// A path given on the command line; it must exist
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    /// Replace the discovery list
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Read overrides from these pairs instead of the process environment
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("finchat.toml"), PathBuf::from(".finchatrc.toml")];

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("finchat").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("finchat").join("config.toml");
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        paths
    }

    pub async fn load(&self) -> Result<FinchatConfig, ConfigError> {
        self.load_with_source().await.map(|(config, _)| config)
    }

    pub async fn load_with_source(&self) -> Result<(FinchatConfig, ConfigSource), ConfigError> {
        let (mut config, source) = self.load_file_layer().await?;
        self.apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;

        match &source {
            ConfigSource::File(path) => info!("Loaded configuration from: {}", path.display()),
            ConfigSource::Default => debug!("No config file found, using defaults"),
        }

        Ok((config, source))
    }

    async fn load_file_layer(&self) -> Result<(FinchatConfig, ConfigSource), ConfigError> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            let config = Self::load_file(path).await?;
            return Ok((config, ConfigSource::File(path.clone())));
        }

        for path in &self.config_paths {
            if path.exists() {
                let config = Self::load_file(path).await?;
                return Ok((config, ConfigSource::File(path.clone())));
            }
        }

        Ok((FinchatConfig::default(), ConfigSource::Default))
    }

    async fn load_file(path: &Path) -> Result<FinchatConfig, ConfigError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
            _ => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        }
    }

    fn apply_env_overrides(&self, config: &mut FinchatConfig) -> Result<(), ConfigError> {
        let prefixed = envy::prefixed(self.env_prefix.as_str());
        let overrides: EnvOverrides = match &self.env_vars {
            Some(vars) => prefixed.from_iter(vars.iter().cloned())?,
            None => prefixed.from_env()?,
        };

        if let Some(top_k) = overrides.top_k {
            config.retrieval.top_k = top_k;
        }
        if let Some(model) = overrides.embedding_model {
            config.embedding.model = model;
        }
        if let Some(model) = overrides.generation_model {
            config.generation.model = model;
        }
        if let Some(endpoint) = overrides.openai_endpoint {
            config.embedding.endpoint = Some(endpoint.clone());
            config.generation.endpoint = Some(endpoint);
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }
        if let Some(data_file) = overrides.data_file {
            config.data_file = data_file;
        }

        Ok(())
    }

    /// Commented starter file for `finchat.toml`
    pub fn generate_example_config() -> Result<String, ConfigError> {
        let body = toml::to_string_pretty(&FinchatConfig::default())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(format!(
            "# FinChat configuration\n# OPENAI_API_KEY is read from the environment or .env\n\n{body}"
        ))
    }
}
