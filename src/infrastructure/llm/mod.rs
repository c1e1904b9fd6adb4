//! LLM integration - Hosted generative text

pub mod traits;
pub mod config;
pub mod providers;
pub mod responder;

pub use traits::{LLM, LLMMessage, LLMResponse, LLMError, LLMResult, LLMUsage, Sampling};
pub use config::LLMConfig;
pub use providers::GeminiProvider;
pub use responder::LlmResponder;
