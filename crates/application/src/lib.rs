//! # Application Layer
//!
//! Turns a user's question into an answer grounded in their own transactions:
//!
//! ```text
//! ContextRepository -> Retriever -> PromptComposer -> GenerationProvider
//! ```
//!
//! [`ChatService`] owns the flow and is the only place where failures are
//! turned into the fixed user-facing replies of [`ChatOutcome`].

pub mod prompt;
pub mod services;

pub use prompt::{PromptComposer, PromptPayload};
pub use services::{ChatOutcome, ChatService, GenerationSettings};
