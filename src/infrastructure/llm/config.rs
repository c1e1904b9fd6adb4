//! LLM Configuration

use serde::{Deserialize, Serialize};

/// Default Gemini generateContent endpoint
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    /// Gemini API key, sent as the `key` query parameter
    pub api_key: Option<String>,
    pub api_url: String,

    /// Sampling settings
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,

    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            temperature: 0.7,
            max_output_tokens: 800,
            top_p: 0.95,
            top_k: 40,
            timeout_secs: 30,
        }
    }
}

impl LLMConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_vars(&|name: &str| std::env::var(name).ok());
        config
    }

    pub(crate) fn apply_vars<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("GEMINI_API_URL") {
            self.api_url = url;
        }
        if let Some(temp) = lookup("LLM_TEMPERATURE") {
            if let Ok(t) = temp.trim().parse() {
                self.temperature = t;
            }
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}
