//! Domain traits - Abstractions for infrastructure implementations

pub mod search;
pub mod effects;

pub use search::WebSearch;
pub use effects::EffectSink;
