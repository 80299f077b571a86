pub mod ask;
pub mod config;
pub mod search;

pub use ask::AskCommand;
pub use config::ConfigCommand;
pub use search::SearchCommand;
