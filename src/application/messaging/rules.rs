//! Intent rules - ordered keyword table, first match wins
//!
//! Several rules can match the same command ("hello, weather in paris").
//! Only the earliest entry fires, so the order of `RULES` is part of the
//! contract.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::{Command, Intent};

/// One entry of the rule table: the intent fires when the command contains
/// any of the keywords
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    pub fn matches(&self, command: &Command) -> bool {
        command.contains_any(self.keywords)
    }
}

pub const RULES: [IntentRule; 13] = [
    IntentRule { intent: Intent::OpenApp, keywords: &["open"] },
    IntentRule {
        intent: Intent::Search,
        keywords: &["search for", "search", "look up", "find information", "tell me about"],
    },
    IntentRule { intent: Intent::Weather, keywords: &["weather"] },
    IntentRule { intent: Intent::News, keywords: &["news"] },
    IntentRule { intent: Intent::Time, keywords: &["time"] },
    IntentRule { intent: Intent::Date, keywords: &["date", "day"] },
    IntentRule { intent: Intent::Greeting, keywords: &["hello", "hi", "hey", "greetings"] },
    IntentRule { intent: Intent::Identity, keywords: &["who are you", "your name", "introduce yourself"] },
    IntentRule { intent: Intent::Joke, keywords: &["joke", "funny"] },
    IntentRule { intent: Intent::Help, keywords: &["help", "what can you do"] },
    IntentRule { intent: Intent::Thanks, keywords: &["thank"] },
    IntentRule { intent: Intent::Farewell, keywords: &["exit", "quit", "goodbye", "bye"] },
    IntentRule { intent: Intent::SystemStatus, keywords: &["system", "status"] },
];

/// Prefixes stripped from search commands, tried in order
const SEARCH_PREFIXES: [&str; 6] = [
    "search for",
    "search",
    "look up",
    "find information about",
    "find information on",
    "tell me about",
];

/// Phrases asking for the search to happen in a browser
const BROWSER_PHRASES: [&str; 3] = ["search the web", "in browser", "open browser"];

static WEATHER_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"weather (?:in|for|at) ([\w\s]+)").expect("valid weather pattern"));

static NEWS_TOPIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"news (?:about|on|regarding) ([\w\s]+)").expect("valid news pattern"));

/// First matching rule, or `Intent::Fallback`
pub fn classify(command: &Command) -> Intent {
    RULES
        .iter()
        .find(|rule| rule.matches(command))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Fallback)
}

/// "open notepad" -> "notepad"
pub fn app_name(command: &Command) -> String {
    command.as_str().replace("open", "").trim().to_string()
}

/// Remove every occurrence of the first search prefix present
pub fn search_query(command: &Command) -> String {
    let text = command.as_str();
    let prefix = SEARCH_PREFIXES
        .iter()
        .find(|p| text.contains(*p))
        .copied()
        .unwrap_or("find");
    text.replace(prefix, "").trim().to_string()
}

pub fn wants_browser(command: &Command) -> bool {
    command.contains_any(&BROWSER_PHRASES)
}

/// "weather in new york" -> "new york"
pub fn weather_location(command: &Command) -> Option<String> {
    capture(&WEATHER_LOCATION, command)
}

/// "news about science" -> "science"
pub fn news_topic(command: &Command) -> Option<String> {
    capture(&NEWS_TOPIC, command)
}

fn capture(pattern: &Regex, command: &Command) -> Option<String> {
    pattern
        .captures(command.as_str())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
