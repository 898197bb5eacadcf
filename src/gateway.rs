//! The boundary to the external chat-completion provider.
//!
//! One operation: send a prompt with a model name and temperature, get the
//! completion text back verbatim. There are **no retries, no streaming, no
//! rate-limit handling, and no explicit timeout** — a failure (network,
//! auth, quota) aborts the current user action and is shown to the user
//! as-is. Whatever timeout applies is the HTTP client's default.
//!
//! [`Completion`] is the seam: the assistant only knows the trait, so tests
//! substitute a scripted implementation and never touch the network.

use crate::error::PdfChatError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A chat-completion backend.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Issue one request and return the completion text verbatim.
    async fn complete(
        &self,
        model: &str,
        temperature: f32,
        prompt: &str,
    ) -> Result<String, PdfChatError>;
}

/// The real gateway, backed by `edgequake-llm` providers.
///
/// The provider is constructed per call because the session's model can
/// change between actions; construction is cheap (no network I/O happens
/// until the request itself).
pub struct LlmGateway {
    provider_name: Option<String>,
    max_tokens: usize,
}

impl LlmGateway {
    pub fn new(provider_name: Option<String>, max_tokens: usize) -> Self {
        Self {
            provider_name,
            max_tokens,
        }
    }

    /// Resolve a provider for `model`, in priority order:
    ///
    /// 1. the name given at construction (e.g. `--provider openai`);
    /// 2. the `EDGEQUAKE_LLM_PROVIDER` environment variable;
    /// 3. auto-detection from API-key environment variables
    ///    (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, …).
    ///
    /// A missing or invalid credential is not validated up front; it
    /// surfaces here or in the request itself, when a call is attempted.
    fn resolve_provider(&self, model: &str) -> Result<Arc<dyn LLMProvider>, PdfChatError> {
        if let Some(ref name) = self.provider_name {
            return create_named_provider(name, model);
        }

        if let Ok(name) = std::env::var("EDGEQUAKE_LLM_PROVIDER") {
            if !name.is_empty() {
                return create_named_provider(&name, model);
            }
        }

        let (provider, _embedding) =
            ProviderFactory::from_env().map_err(|e| PdfChatError::ProviderNotConfigured {
                provider: "auto".to_string(),
                hint: format!(
                    "No LLM provider could be auto-detected from environment.\n\
                     Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --provider.\n\
                     Error: {}",
                    e
                ),
            })?;
        Ok(provider)
    }
}

#[async_trait]
impl Completion for LlmGateway {
    async fn complete(
        &self,
        model: &str,
        temperature: f32,
        prompt: &str,
    ) -> Result<String, PdfChatError> {
        let provider = self.resolve_provider(model)?;
        let messages = vec![ChatMessage::user(prompt)];
        let options = build_options(temperature, self.max_tokens);

        let start = Instant::now();
        let response = provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| PdfChatError::CompletionFailed {
                message: e.to_string(),
            })?;

        debug!(
            "Completion: model={}, {} input tokens, {} output tokens, {:?}",
            model,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        Ok(response.content)
    }
}

/// Instantiate a named provider; the API key is read from the environment
/// by the factory.
fn create_named_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, PdfChatError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PdfChatError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Build `CompletionOptions` for one request.
fn build_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_carries_temperature_and_max_tokens() {
        let opts = build_options(0.7, 1024);
        assert_eq!(opts.temperature, Some(0.7));
        assert_eq!(opts.max_tokens, Some(1024));
    }
}
