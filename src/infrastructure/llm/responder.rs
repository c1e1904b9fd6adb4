//! Turns LLM calls into user-facing sentences

use std::sync::Arc;

use crate::infrastructure::config::{Config, Mode};
use crate::infrastructure::llm::{GeminiProvider, LLMConfig, LLMError, LLMMessage, Sampling, LLM};

/// Wraps an optional LLM provider. `ask` never fails: errors come back as
/// plain sentences.
#[derive(Clone)]
pub struct LlmResponder {
    provider: Option<Arc<dyn LLM>>,
    settings: LLMConfig,
    mode: Mode,
}

impl LlmResponder {
    pub fn new(provider: Option<Arc<dyn LLM>>, settings: LLMConfig, mode: Mode) -> Self {
        Self { provider, settings, mode }
    }

    pub fn disabled(mode: Mode) -> Self {
        Self::new(None, LLMConfig::default(), mode)
    }

    /// Build the Gemini provider when the feature is enabled and keyed
    pub fn from_config(config: &Config) -> Self {
        let provider: Option<Arc<dyn LLM>> = if config.llm_enabled() {
            match GeminiProvider::new(&config.llm) {
                Ok(p) => Some(Arc::new(p)),
                Err(e) => {
                    tracing::error!("Failed to create Gemini provider: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self::new(provider, config.llm.clone(), config.mode)
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Temperature for callers that do not choose one
    pub fn default_temperature(&self) -> f32 {
        self.settings.temperature
    }

    /// Send `prompt` as a single user turn
    pub async fn ask(&self, prompt: &str, temperature: f32) -> String {
        let Some(provider) = &self.provider else {
            return self.not_configured().to_string();
        };

        let preview: String = prompt.chars().take(50).collect();
        tracing::info!("Sending prompt to {}: {}...", provider.name(), preview);

        let sampling = Sampling {
            temperature,
            max_tokens: self.settings.max_output_tokens,
            top_p: self.settings.top_p,
            top_k: self.settings.top_k,
        };

        match provider.chat(vec![LLMMessage::user(prompt)], sampling).await {
            Ok(response) => response.content,
            Err(e) => self.describe_error(&e),
        }
    }

    fn not_configured(&self) -> &'static str {
        match self.mode {
            Mode::Online => "Gemini API is not configured. Please set GEMINI_API_KEY in the .env file.",
            Mode::Offline => "Gemini API is not available in offline mode.",
        }
    }

    fn describe_error(&self, error: &LLMError) -> String {
        match error {
            LLMError::ApiError { status, .. } => format!(
                "I encountered an error while processing your request. Status code: {}",
                status
            ),
            LLMError::NoText => {
                "I received a response from Gemini, but couldn't extract the text. Please try again.".to_string()
            }
            other => {
                tracing::error!("Error in Gemini API request: {}", other);
                match self.mode {
                    Mode::Online => format!("I encountered an error while communicating with Gemini: {}", other),
                    Mode::Offline => {
                        "I'm currently in offline mode. I'll use my built-in knowledge to help you instead.".to_string()
                    }
                }
            }
        }
    }
}
