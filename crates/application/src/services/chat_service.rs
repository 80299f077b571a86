//! Chat Service
//!
//! Answers one user question end to end:
//!
//! ```text
//! START -> context lookup -> NO_DATA | CONTEXT_FOUND
//! CONTEXT_FOUND -> retrieval -> RETRIEVED | NO_DATA | RETRIEVAL_UNAVAILABLE
//! RETRIEVED -> compose + generate -> RESPONDED | GENERATION_UNAVAILABLE
//! ```
//!
//! Every terminal state has a fixed user-facing reply, so `respond` never
//! returns an error.

use crate::prompt::PromptComposer;
use common::{OperationTimer, RequestContext};
use domain::{ContextRepository, FinancialContext};
use llm::{GenerationProvider, GenerationRequest, ProviderError};
use memory::Retriever;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn, Instrument};

pub const NO_DATA_MESSAGE: &str =
    "I can't seem to find any transaction data to analyze. Please upload a CSV first.";
pub const RETRIEVAL_UNAVAILABLE_MESSAGE: &str =
    "I had trouble analyzing your transactions. Please try again.";
pub const GENERATION_UNAVAILABLE_MESSAGE: &str =
    "I'm having trouble connecting to my AI brain right now.";
pub const BLANK_RESPONSE_MESSAGE: &str = "I'm not sure how to respond to that.";

/// Terminal state of a chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    NoData,
    RetrievalUnavailable,
    GenerationUnavailable,
    Responded(String),
}

impl ChatOutcome {
    /// Text shown to the user
    pub fn message(&self) -> &str {
        match self {
            ChatOutcome::NoData => NO_DATA_MESSAGE,
            ChatOutcome::RetrievalUnavailable => RETRIEVAL_UNAVAILABLE_MESSAGE,
            ChatOutcome::GenerationUnavailable => GENERATION_UNAVAILABLE_MESSAGE,
            ChatOutcome::Responded(text) => text,
        }
    }

    pub fn state(&self) -> &'static str {
        match self {
            ChatOutcome::NoData => "NO_DATA",
            ChatOutcome::RetrievalUnavailable => "RETRIEVAL_UNAVAILABLE",
            ChatOutcome::GenerationUnavailable => "GENERATION_UNAVAILABLE",
            ChatOutcome::Responded(_) => "RESPONDED",
        }
    }

    pub fn is_responded(&self) -> bool {
        matches!(self, ChatOutcome::Responded(_))
    }

    fn from_generated(content: String) -> Self {
        if content.trim().is_empty() {
            ChatOutcome::Responded(BLANK_RESPONSE_MESSAGE.to_string())
        } else {
            ChatOutcome::Responded(content)
        }
    }
}

/// Parameters for the generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_output_tokens: 200,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct ChatService {
    contexts: Arc<dyn ContextRepository>,
    retriever: Retriever,
    generator: Arc<dyn GenerationProvider>,
    composer: PromptComposer,
    settings: GenerationSettings,
}

impl ChatService {
    pub fn new(
        contexts: Arc<dyn ContextRepository>,
        retriever: Retriever,
        generator: Arc<dyn GenerationProvider>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            contexts,
            retriever,
            generator,
            composer: PromptComposer::new(),
            settings,
        }
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub async fn respond(&self, user_id: &str, message: &str) -> ChatOutcome {
        let request = RequestContext::new().with_user(user_id);

        let outcome = self
            .run(user_id, message)
            .instrument(request.span())
            .await;

        info!(
            request_id = %request.request_id,
            user_id,
            state = outcome.state(),
            duration_ms = request.elapsed_ms(),
            "Chat request finished"
        );
        outcome
    }

    async fn run(&self, user_id: &str, message: &str) -> ChatOutcome {
        info!(user_id, "Generating grounded response");

        let Some(context) = self.load_context(user_id).await else {
            return ChatOutcome::NoData;
        };

        let retrieval = match self.retriever.retrieve(&context, message).await {
            Ok(retrieval) => retrieval,
            Err(e) if e.is_no_data() => {
                debug!(user_id, "No indexable transactions");
                return ChatOutcome::NoData;
            }
            Err(e) => {
                error!(user_id, error = %e, "Retrieval failed");
                return ChatOutcome::RetrievalUnavailable;
            }
        };

        let payload = self.composer.compose(message, &retrieval.results);
        let request = GenerationRequest::new(payload.system_prompt, payload.user_message)
            .with_parameters(self.settings.temperature, self.settings.max_output_tokens);

        match self.generate(request).await {
            Ok(content) => ChatOutcome::from_generated(content),
            Err(e) => {
                error!(user_id, error = %e, "Generation failed");
                ChatOutcome::GenerationUnavailable
            }
        }
    }

    /// `None` when the user has no transactions or the store failed
    async fn load_context(&self, user_id: &str) -> Option<FinancialContext> {
        match self.contexts.get_context(user_id).await {
            Ok(Some(context)) if context.has_transactions() => Some(context),
            Ok(_) => {
                debug!(user_id, "No transaction history");
                None
            }
            Err(e) => {
                warn!(user_id, error = %e, "Context lookup failed");
                None
            }
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        let mut timer = OperationTimer::new("generation");
        timer.add_field("provider", self.generator.id().to_string());

        let limit = self.settings.timeout;
        let result = match timeout(limit, self.generator.generate(request)).await {
            Ok(result) => result.map(|response| response.content),
            Err(_) => Err(ProviderError::Timeout(limit)),
        };

        timer.finish_with_result(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        assert_eq!(ChatOutcome::NoData.message(), NO_DATA_MESSAGE);
        assert_eq!(
            ChatOutcome::RetrievalUnavailable.message(),
            "I had trouble analyzing your transactions. Please try again."
        );
        assert_eq!(
            ChatOutcome::GenerationUnavailable.message(),
            "I'm having trouble connecting to my AI brain right now."
        );
        assert_eq!(ChatOutcome::Responded("hi".into()).message(), "hi");
    }

    #[test]
    fn test_blank_generation_falls_back() {
        assert_eq!(
            ChatOutcome::from_generated("  \n".to_string()),
            ChatOutcome::Responded(BLANK_RESPONSE_MESSAGE.to_string())
        );
        assert_eq!(
            ChatOutcome::from_generated("Spent $6".to_string()).state(),
            "RESPONDED"
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.temperature, 0.5);
        assert_eq!(settings.max_output_tokens, 200);
        assert_eq!(settings.timeout, Duration::from_secs(60));
    }
}
