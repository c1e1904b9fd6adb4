//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - LLM: Hosted model client
//! - Providers: Weather, news and web search
//! - Effects and speech: Fire-and-forget OS side effects
//! - Adapters: HTTP API and console front ends

pub mod config;
pub mod llm;
pub mod providers;
pub mod effects;
pub mod speech;
pub mod adapters;
