//! End-to-end behaviour of ChatService with mocked collaborators

use application::{ChatOutcome, ChatService, GenerationSettings, PromptComposer};
use async_trait::async_trait;
use domain::{ContextRepository, FinancialContext, Transaction};
use llm::{
    EmbeddingProvider, GenerationProvider, GenerationRequest, GenerationResponse, ProviderError,
    ProviderId, ProviderResult,
};
use memory::{Retriever, RetrieverConfig};
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

mock! {
    Contexts {}

    #[async_trait]
    impl ContextRepository for Contexts {
        async fn get_context(&self, user_id: &str) -> anyhow::Result<Option<FinancialContext>>;
    }
}

const VOCABULARY: [&str; 3] = ["coffee", "gas", "salary"];

/// Keyword presence vector plus a small constant so no text embeds to zero
struct KeywordEmbedder {
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: None,
            fail: false,
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn id(&self) -> ProviderId {
        ProviderId::new("keyword", "test")
    }

    async fn embed(&self, batch: &[String]) -> ProviderResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ProviderError::Http {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(batch
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                let mut v: Vec<f32> = VOCABULARY
                    .iter()
                    .map(|w| if lower.contains(w) { 1.0 } else { 0.0 })
                    .collect();
                v.push(0.1);
                v
            })
            .collect())
    }
}

enum Reply {
    Text(&'static str),
    Error,
    Hang,
}

struct FakeGenerator {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl FakeGenerator {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> GenerationRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }
}

#[async_trait]
impl GenerationProvider for FakeGenerator {
    fn id(&self) -> ProviderId {
        ProviderId::new("fake", "test")
    }

    async fn generate(&self, request: GenerationRequest) -> ProviderResult<GenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        let content = match self.reply {
            Reply::Text(text) => text.to_string(),
            Reply::Error => return Err(ProviderError::Transport("connection reset".to_string())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(10)).await;
                String::new()
            }
        };
        Ok(GenerationResponse {
            content,
            usage: None,
            model: "test".to_string(),
            response_time: Duration::ZERO,
        })
    }
}

fn coffee_context() -> FinancialContext {
    FinancialContext::with_transactions(vec![
        Transaction::new("Coffee Shop", -4.5),
        Transaction::new("Gas Station", -40.0),
        Transaction::new("Salary Deposit", 2500.0),
    ])
}

fn contexts_returning(context: Option<FinancialContext>) -> MockContexts {
    let mut contexts = MockContexts::new();
    contexts
        .expect_get_context()
        .withf(|user_id: &str| user_id == "user-1")
        .times(1)
        .returning(move |_| Ok(context.clone()));
    contexts
}

fn service(
    contexts: MockContexts,
    embedder: Arc<KeywordEmbedder>,
    generator: Arc<FakeGenerator>,
    retriever_config: RetrieverConfig,
    settings: GenerationSettings,
) -> ChatService {
    ChatService::new(
        Arc::new(contexts),
        Retriever::new(embedder, retriever_config),
        generator,
        settings,
    )
}

#[tokio::test]
async fn test_coffee_question_is_grounded_in_ranked_transactions() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(FakeGenerator::new(Reply::Text("You spent $4.50 on coffee.")));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        embedder.clone(),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    let outcome = chat
        .respond("user-1", "How much did I spend on coffee?")
        .await;

    assert_eq!(
        outcome,
        ChatOutcome::Responded("You spent $4.50 on coffee.".to_string())
    );
    assert_eq!(embedder.calls(), 2);
    assert_eq!(generator.calls(), 1);

    let request = generator.last_request();
    assert_eq!(request.user_message, "How much did I spend on coffee?");
    assert_eq!(request.temperature, 0.5);
    assert_eq!(request.max_output_tokens, 200);

    let prompt = &request.system_context;
    assert!(prompt.contains("- Transaction 1: \"Coffee Shop\""));
    // The other two tie, so they keep their stored order
    assert!(prompt.contains("- Transaction 2: \"Gas Station\""));
    assert!(prompt.contains("- Transaction 3: \"Salary Deposit\""));
}

#[tokio::test]
async fn test_unknown_user_is_no_data() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(FakeGenerator::new(Reply::Text("unused")));
    let chat = service(
        contexts_returning(None),
        embedder.clone(),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    let outcome = chat.respond("user-1", "anything").await;

    assert_eq!(outcome, ChatOutcome::NoData);
    assert_eq!(
        outcome.message(),
        "I can't seem to find any transaction data to analyze. Please upload a CSV first."
    );
    assert_eq!(embedder.calls(), 0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_empty_transactions_is_no_data_without_embedding() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(FakeGenerator::new(Reply::Text("unused")));
    let chat = service(
        contexts_returning(Some(FinancialContext::default())),
        embedder.clone(),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    assert_eq!(chat.respond("user-1", "coffee").await, ChatOutcome::NoData);
    assert_eq!(embedder.calls(), 0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_blank_descriptions_only_is_no_data() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(FakeGenerator::new(Reply::Text("unused")));
    let context = FinancialContext::with_transactions(vec![Transaction::new("   ", -1.0)]);
    let chat = service(
        contexts_returning(Some(context)),
        embedder.clone(),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    assert_eq!(chat.respond("user-1", "coffee").await, ChatOutcome::NoData);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_store_failure_is_no_data() {
    let mut contexts = MockContexts::new();
    contexts
        .expect_get_context()
        .returning(|_| Err(anyhow::anyhow!("document store offline")));

    let generator = Arc::new(FakeGenerator::new(Reply::Text("unused")));
    let chat = service(
        contexts,
        Arc::new(KeywordEmbedder::new()),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    assert_eq!(chat.respond("user-1", "coffee").await, ChatOutcome::NoData);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_embedding_timeout_never_reaches_generation() {
    let embedder = Arc::new(KeywordEmbedder::slow(Duration::from_secs(5)));
    let generator = Arc::new(FakeGenerator::new(Reply::Text("unused")));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        embedder,
        generator.clone(),
        RetrieverConfig {
            embedding_timeout: Duration::from_millis(50),
            ..RetrieverConfig::default()
        },
        GenerationSettings::default(),
    );

    let outcome = chat.respond("user-1", "coffee").await;

    assert_eq!(outcome, ChatOutcome::RetrievalUnavailable);
    assert_eq!(
        outcome.message(),
        "I had trouble analyzing your transactions. Please try again."
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_embedding_error_is_retrieval_unavailable() {
    let generator = Arc::new(FakeGenerator::new(Reply::Text("unused")));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        Arc::new(KeywordEmbedder::failing()),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    assert_eq!(
        chat.respond("user-1", "coffee").await,
        ChatOutcome::RetrievalUnavailable
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_generation_error_is_generation_unavailable() {
    let generator = Arc::new(FakeGenerator::new(Reply::Error));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        Arc::new(KeywordEmbedder::new()),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    let outcome = chat.respond("user-1", "coffee").await;
    assert_eq!(outcome, ChatOutcome::GenerationUnavailable);
    assert_eq!(
        outcome.message(),
        "I'm having trouble connecting to my AI brain right now."
    );
}

#[tokio::test]
async fn test_generation_timeout_is_generation_unavailable() {
    let generator = Arc::new(FakeGenerator::new(Reply::Hang));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        Arc::new(KeywordEmbedder::new()),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings {
            timeout: Duration::from_millis(50),
            ..GenerationSettings::default()
        },
    );

    assert_eq!(
        chat.respond("user-1", "coffee").await,
        ChatOutcome::GenerationUnavailable
    );
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_blank_generation_uses_fallback_text() {
    let generator = Arc::new(FakeGenerator::new(Reply::Text("   ")));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        Arc::new(KeywordEmbedder::new()),
        generator,
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    let outcome = chat.respond("user-1", "coffee").await;
    assert_eq!(outcome.message(), "I'm not sure how to respond to that.");
    assert_eq!(outcome.state(), "RESPONDED");
}

#[tokio::test]
async fn test_single_transaction_prompt_has_one_line() {
    let generator = Arc::new(FakeGenerator::new(Reply::Text("ok")));
    let context = FinancialContext::with_transactions(vec![Transaction::new("Coffee Shop", -3.0)]);
    let chat = service(
        contexts_returning(Some(context)),
        Arc::new(KeywordEmbedder::new()),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    );

    chat.respond("user-1", "coffee").await;

    let prompt = generator.last_request().system_context;
    assert!(prompt.contains("- Transaction 1: \"Coffee Shop\""));
    assert!(!prompt.contains("- Transaction 2"));
}

#[tokio::test]
async fn test_detailed_composer_is_used() {
    let generator = Arc::new(FakeGenerator::new(Reply::Text("ok")));
    let chat = service(
        contexts_returning(Some(coffee_context())),
        Arc::new(KeywordEmbedder::new()),
        generator.clone(),
        RetrieverConfig::default(),
        GenerationSettings::default(),
    )
    .with_composer(PromptComposer::new().with_details(true));

    chat.respond("user-1", "coffee").await;

    assert!(generator
        .last_request()
        .system_context
        .contains("\"Coffee Shop\" (amount: -4.50"));
}
