//! LLM traits - Unified AI interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat message for LLM conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options for one request
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

/// LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Response content
    pub content: String,
    /// Model used
    pub model: String,
    /// Number of tokens used (if available)
    pub usage: Option<LLMUsage>,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// LLM errors
#[derive(Debug)]
pub enum LLMError {
    /// API key missing
    MissingApiKey,
    /// Non-success status, or a body that could not be decoded
    ApiError { status: u16, body: String },
    /// Network error
    NetworkError(String),
    /// Response decoded but carried no text
    NoText,
    /// Configuration error
    ConfigError(String),
}

impl std::fmt::Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::MissingApiKey => write!(f, "Missing API key"),
            LLMError::ApiError { status, body } => write!(f, "API error: status {}, body: {}", status, body),
            LLMError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LLMError::NoText => write!(f, "No text in response"),
            LLMError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for LLMError {}

/// Result type for LLM operations
pub type LLMResult<T> = Result<T, LLMError>;

/// LLM Provider trait
#[async_trait]
pub trait LLM: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Single completion over the given messages
    async fn chat(&self, messages: Vec<LLMMessage>, sampling: Sampling) -> LLMResult<LLMResponse>;
}
