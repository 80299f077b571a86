pub mod loader;
pub mod settings;
pub mod validator;

pub use loader::{ConfigLoader, ConfigSource};
pub use settings::{
    EmbeddingSettings, FinchatConfig, GenerationConfig, LoggingSettings, RetrievalSettings,
};
pub use validator::{ConfigError, ConfigValidator};
