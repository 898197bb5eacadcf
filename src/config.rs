//! Assistant configuration.
//!
//! Everything a session starts from lives in [`AssistantConfig`], built via
//! its builder so callers set only what they care about. Model and
//! temperature are just the *initial* values — both can be changed on the
//! live session afterwards.

use crate::error::PdfChatError;
use crate::gateway::Completion;
use std::fmt;
use std::sync::Arc;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// The fixed model set offered by the presentation layer. `--model` accepts
/// any identifier; this list is what gets displayed.
pub const KNOWN_MODELS: [&str; 3] = [
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "mixtral-8x7b-32768",
];

/// Configuration for an [`crate::Assistant`].
#[derive(Clone)]
pub struct AssistantConfig {
    /// Initial model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Initial sampling temperature in `[0.0, 1.0]`. Default: 0.7.
    ///
    /// Higher values make answers more creative, lower values more factual.
    pub temperature: f32,

    /// Provider name (e.g. "openai", "anthropic", "ollama"). If `None`, the
    /// gateway auto-detects one from the environment.
    pub provider_name: Option<String>,

    /// Maximum tokens the model may generate per answer. Default: 1024.
    pub max_tokens: usize,

    /// Pre-constructed completion backend. Takes precedence over
    /// `provider_name`; used by tests and callers wanting middleware.
    pub completion: Option<Arc<dyn Completion>>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            provider_name: None,
            max_tokens: 1024,
            completion: None,
        }
    }
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("provider_name", &self.provider_name)
            .field("max_tokens", &self.max_tokens)
            .field("completion", &self.completion.as_ref().map(|_| "<dyn Completion>"))
            .finish()
    }
}

impl AssistantConfig {
    /// Create a new builder.
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AssistantConfig`].
#[derive(Debug)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Clamped to `[0.0, 1.0]`.
    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 1.0);
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn completion(mut self, completion: Arc<dyn Completion>) -> Self {
        self.config.completion = Some(completion);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AssistantConfig, PdfChatError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PdfChatError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&c.temperature) {
            return Err(PdfChatError::InvalidConfig(format!(
                "Temperature must be in [0.0, 1.0], got {}",
                c.temperature
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AssistantConfig::default();
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.temperature, 0.7);
        assert_eq!(c.max_tokens, 1024);
        assert!(c.provider_name.is_none());
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = AssistantConfig::builder()
            .temperature(2.5)
            .build()
            .unwrap();
        assert_eq!(c.temperature, 1.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = AssistantConfig::builder().model("  ").build().unwrap_err();
        assert!(matches!(err, PdfChatError::InvalidConfig(_)));
    }

    #[test]
    fn known_models_include_the_default() {
        assert!(KNOWN_MODELS.contains(&DEFAULT_MODEL));
    }
}
