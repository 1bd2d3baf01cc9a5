//! Scripted provider used as a test double.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    NoContent,
    Failure(String),
}

/// Returns a fixed reply and records every call it receives.
pub struct MockTextProvider {
    reply: MockReply,
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, GenerationParams)>>,
}

impl MockTextProvider {
    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    /// Completes every prompt with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    /// Succeeds at the transport level but returns no completion text.
    pub fn without_content() -> Self {
        Self::with_reply(MockReply::NoContent)
    }

    /// Fails every call with a network error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Failure(message.into()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt and parameters of the most recent call.
    pub fn last_call(&self) -> Option<(String, GenerationParams)> {
        self.last_call
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some((prompt.to_string(), params.clone()));
        }

        let text = match &self.reply {
            MockReply::Text(text) => Some(text.clone()),
            MockReply::NoContent => None,
            MockReply::Failure(message) => {
                return Err(ProviderError::NetworkError(message.clone()));
            }
        };

        Ok(ProviderResponse {
            output_tokens: text.as_ref().map_or(0, |t| t.len() as i32 / 4),
            text,
            input_tokens: prompt.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }
}
