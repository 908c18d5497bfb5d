/*!
 * Mock provider implementations for testing.
 *
 * The mock speaks the same chat-completions types as the OpenRouter client so
 * it can stand in for it inside the analysis service:
 * - `MockProvider::working()` - answers with a well-formed analysis document
 * - `MockProvider::intermittent(n)` - fails every n-th request
 * - `MockProvider::failing()` - always fails with an API error
 */

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::openrouter::{ChatRequest, ChatResponse};
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with an analysis document
    Working,
    /// Wraps the document in reasoning and `<json>` markers
    Wrapped,
    /// Answers with prose instead of JSON
    Malformed,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty message
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing analysis behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&ChatRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn wrapped() -> Self {
        Self::new(MockBehavior::Wrapped)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&ChatRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// A valid analysis document for `text`
    pub fn analysis_json(text: &str, slang: &[&str]) -> String {
        json!({
            "text": text,
            "cefr": "B1",
            "features": [
                { "rule": "Present Simple", "translation": "Present Simple" }
            ],
            "translations": [
                { "style": "natural", "text": format!("[natural] {}", text) },
                { "style": "literal", "text": format!("[literal] {}", text) }
            ],
            "explanation": "Mock explanation.",
            "slang": slang,
        })
        .to_string()
    }

    /// The sentence quoted in the user prompt, if any
    pub fn quoted_sentence(request: &ChatRequest) -> String {
        request.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .and_then(|m| m.content.split('"').nth(1))
            .unwrap_or_default()
            .to_string()
    }

    fn respond(&self, request: &ChatRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => Self::analysis_json(&Self::quoted_sentence(request), &[]),
        }
    }

    fn reply(&self, request: &ChatRequest, content: String) -> ChatResponse {
        ChatResponse::from_content(request.model.clone(), content)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.reply(&request, self.respond(&request))),

            MockBehavior::Wrapped => {
                let content = format!(
                    "<think>Let me look at this sentence.</think>\nSure! <json>{}</json>",
                    self.respond(&request)
                );
                Ok(self.reply(&request, content))
            }

            MockBehavior::Malformed => Ok(self.reply(&request, "I cannot analyse this sentence.".to_string())),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.reply(&request, self.respond(&request)))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(self.reply(&request, String::new())),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.reply(&request, self.respond(&request)))
            }
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
