//! Request handling for compound lookups.

use crate::error::CompoundError;
use crate::models::{CompoundRequest, GenerationPrompt, GenerationResult};
use crate::services::metrics;
use crate::services::normalizer::normalize;
use crate::services::providers::{GenerationParams, TextProvider};
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

/// Sampling temperature for every structure request.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Builds the prompt, calls the injected provider once and normalizes its output.
///
/// Holds no per-request state; clones share the same provider.
#[derive(Clone)]
pub struct CompoundService {
    provider: Arc<dyn TextProvider>,
    model: String,
}

impl CompoundService {
    pub fn new(provider: Arc<dyn TextProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip_all, fields(compound_name = tracing::field::Empty))]
    pub async fn handle(&self, request: CompoundRequest) -> GenerationResult {
        request
            .validate()
            .map_err(|_| CompoundError::MissingInput)?;
        let compound_name = request.compound_name.ok_or(CompoundError::MissingInput)?;
        tracing::Span::current().record("compound_name", compound_name.as_str());

        let prompt = GenerationPrompt::for_compound(&compound_name);
        let params = GenerationParams {
            model: self.model.clone(),
            temperature: Some(GENERATION_TEMPERATURE),
        };

        let raw_text = self.generate(&prompt, &params).await?;
        normalize(&raw_text)
    }

    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        params: &GenerationParams,
    ) -> Result<String, CompoundError> {
        let provider = self.provider.name();
        let start = Instant::now();
        let result = self.provider.generate(prompt.as_str(), params).await;
        metrics::record_provider_latency(provider, &params.model, start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            metrics::record_provider_error(provider, e.error_type());
            tracing::error!(provider, model = %params.model, error = %e, "Generation service call failed");
            CompoundError::from(e)
        })?;

        tracing::debug!(
            provider,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Generation completed"
        );

        response.text.ok_or_else(|| {
            metrics::record_provider_error(provider, "empty_response");
            tracing::error!(provider, "Generation service returned no content");
            CompoundError::ServerError("generation service returned no content".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prompt::WATER_EXAMPLE;
    use crate::services::providers::mock::MockTextProvider;

    fn service(provider: &Arc<MockTextProvider>) -> CompoundService {
        CompoundService::new(provider.clone(), "gpt-4")
    }

    #[tokio::test]
    async fn missing_name_never_calls_provider() {
        let provider = Arc::new(MockTextProvider::replying(WATER_EXAMPLE));
        let service = service(&provider);

        for request in [CompoundRequest::default(), CompoundRequest::new("")] {
            let result = service.handle(request).await;
            assert!(matches!(result, Err(CompoundError::MissingInput)));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn sends_prompt_with_fixed_temperature_and_model() {
        let provider = Arc::new(MockTextProvider::replying(WATER_EXAMPLE));
        let payload = service(&provider)
            .handle(CompoundRequest::new("water"))
            .await
            .unwrap();

        assert_eq!(payload.raw_text, WATER_EXAMPLE);
        assert_eq!(provider.call_count(), 1);

        let (prompt, params) = provider.last_call().unwrap();
        assert_eq!(prompt, GenerationPrompt::for_compound("water").as_str());
        assert_eq!(params.model, "gpt-4");
        assert_eq!(params.temperature, Some(GENERATION_TEMPERATURE));
    }

    #[tokio::test]
    async fn provider_failure_becomes_server_error() {
        let provider = Arc::new(MockTextProvider::failing("connection refused"));
        let result = service(&provider).handle(CompoundRequest::new("water")).await;
        assert!(matches!(result, Err(CompoundError::ServerError(_))));
    }

    #[tokio::test]
    async fn missing_completion_becomes_server_error() {
        let provider = Arc::new(MockTextProvider::without_content());
        let result = service(&provider).handle(CompoundRequest::new("water")).await;
        assert!(matches!(result, Err(CompoundError::ServerError(_))));
    }

    #[tokio::test]
    async fn malformed_output_surfaces_normalizer_error() {
        let provider = Arc::new(MockTextProvider::replying(r#"{"structure": {}}"#));
        let result = service(&provider).handle(CompoundRequest::new("water")).await;
        assert!(matches!(result, Err(CompoundError::InvalidShape)));
    }
}
