//! Response providers
//!
//! Each provider answers one category of request and always returns a
//! display string. Failures become apologies, never errors.

pub mod weather;
pub mod news;
pub mod search;

pub use weather::WeatherProvider;
pub use news::{NewsProvider, NewsTopic};
pub use search::DuckDuckGoSearch;
