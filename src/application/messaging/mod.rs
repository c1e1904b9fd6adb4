//! Command handling - rule table and dispatcher

pub mod dispatcher;
pub mod rules;

pub use dispatcher::{IntentDispatcher, Reply};
pub use rules::{classify, IntentRule, RULES};
