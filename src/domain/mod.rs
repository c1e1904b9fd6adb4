//! Domain layer - Core types with no external dependencies
//!
//! This layer contains:
//! - Entities: Command, Intent, Effect
//! - Traits: Abstractions the application layer talks to (WebSearch, EffectSink)

pub mod entities;
pub mod traits;
