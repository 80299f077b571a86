//! Adapters to the outside world: configuration files and the document store

pub mod config;
pub mod context_store;

pub use config::{
    ConfigError, ConfigLoader, ConfigSource, EmbeddingSettings, FinchatConfig, GenerationConfig,
    LoggingSettings, RetrievalSettings,
};
pub use context_store::JsonContextStore;
