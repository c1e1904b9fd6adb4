//! Front-end adapters

pub mod console;
pub mod http;

pub use console::ConsoleAdapter;
pub use http::{build_app, AppState};
