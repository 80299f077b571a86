//! Application services coordinating domain, retrieval and providers

pub mod chat_service;

pub use chat_service::{ChatOutcome, ChatService, GenerationSettings};
