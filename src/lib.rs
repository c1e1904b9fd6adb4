//! KAEL - Knowledge and Artificially Enhanced Logic
//!
//! A keyword-triggered assistant backend. Commands are matched against an
//! ordered rule table and answered either from canned tables, from simulated
//! providers, or by forwarding to a hosted LLM.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::messaging::IntentDispatcher;
pub use infrastructure::config::Config;
