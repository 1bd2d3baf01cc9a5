//! Text-generation provider abstraction.
//!
//! The compound service only needs "prompt in, text out", so any backend
//! implementing [`TextProvider`] can be injected (OpenAI, mock).

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no completion text")]
    EmptyResponse,
}

impl ProviderError {
    /// Label for the provider error counter.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::EmptyResponse => "empty_response",
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Result of a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Completion text of the first choice.
    pub text: Option<String>,

    pub input_tokens: i32,

    pub output_tokens: i32,

    pub finish_reason: FinishReason,
}

/// Generation parameters for one request.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Model identifier, e.g. `gpt-4`.
    pub model: String,

    /// Sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short provider name used in logs and metric labels.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the completion.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}
