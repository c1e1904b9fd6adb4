//! Web search through the DuckDuckGo instant-answer API

use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::errors::ProviderError;
use crate::application::responses::{clock_time, long_date, JOKES};
use crate::domain::traits::WebSearch;
use crate::infrastructure::config::{Config, Mode};

/// Instant-answer endpoint, no API key needed
const API_BASE: &str = "https://api.duckduckgo.com/";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Related topics examined when there is no abstract
const MAX_TOPICS: usize = 3;

const OFFLINE_APOLOGY: &str = "I'm currently in offline mode and can't search the web. I can still help with basic questions using my built-in knowledge.";

pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    enabled: bool,
    mode: Mode,
}

/// Instant-answer payload, only the fields we read
#[derive(Deserialize, Debug, Default)]
struct InstantAnswer {
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Grouped topics carry no `Text` and are skipped
#[derive(Deserialize, Debug)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
}

impl DuckDuckGoSearch {
    pub fn new(enabled: bool, mode: Mode) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: API_BASE.to_string(),
            enabled,
            mode,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(config.features.search, config.mode)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn lookup(&self, query: &str) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::Disabled("Web search"));
        }

        let response = self.client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        // The API may label JSON as javascript, so decode the text ourselves
        let body = response.text().await.map_err(|e| ProviderError::Network(e.to_string()))?;
        let answer: InstantAnswer = serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;

        summarize(&answer).ok_or(ProviderError::Empty)
    }

    fn fallback(&self, query: &str, error: &ProviderError, now: &DateTime<Local>) -> String {
        match self.mode {
            Mode::Online => match error {
                ProviderError::Disabled(_) => "Web search is currently disabled.".to_string(),
                ProviderError::Status(_) => format!(
                    "I couldn't find information about {}. The search service returned an error.",
                    query
                ),
                ProviderError::Empty => format!(
                    "I couldn't find specific information about {}. Would you like me to open a web search?",
                    query
                ),
                ProviderError::Network(_) | ProviderError::Parse(_) => format!(
                    "I encountered an error while searching for {}. Would you like me to open a web browser instead?",
                    query
                ),
            },
            Mode::Offline => offline_answer(query, now).unwrap_or_else(|| OFFLINE_APOLOGY.to_string()),
        }
    }
}

/// Abstract if present, else up to three related-topic texts
fn summarize(answer: &InstantAnswer) -> Option<String> {
    if !answer.abstract_text.trim().is_empty() {
        return Some(answer.abstract_text.clone());
    }

    let texts: Vec<&str> = answer
        .related_topics
        .iter()
        .take(MAX_TOPICS)
        .filter_map(|t| t.text.as_deref())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(format!("Here's what I found: {}", texts.join(" ")))
    }
}

/// Built-in answers for common queries, first keyword match wins
fn offline_answer(query: &str, now: &DateTime<Local>) -> Option<String> {
    let query = query.to_lowercase();

    let answers: [(&str, String); 9] = [
        ("weather", "I'm in offline mode and can't check the weather right now. When online, I can provide real-time weather information for any location.".to_string()),
        ("news", "I'm in offline mode and can't fetch the latest news. When online, I can provide current news headlines on various topics.".to_string()),
        ("time", format!("The current time is {}.", clock_time(now))),
        ("date", format!("Today is {}.", long_date(now))),
        ("joke", JOKES[0].to_string()),
        ("quantum computing", "Quantum computing uses quantum bits or qubits that can exist in multiple states simultaneously, unlike classical bits. This allows quantum computers to solve certain problems much faster than traditional computers.".to_string()),
        ("artificial intelligence", "Artificial Intelligence (AI) refers to systems designed to mimic human intelligence. It encompasses machine learning, natural language processing, computer vision, and more.".to_string()),
        ("jarvis", "JARVIS (Just A Rather Very Intelligent System) is a fictional AI assistant created by Tony Stark in the Marvel universe. I'm KAEL, inspired by similar principles but designed for real-world use.".to_string()),
        ("kael", "I am KAEL (Knowledge and Artificially Enhanced Logic), your AI assistant. I can help with information, perform tasks, and assist with various queries even in offline mode.".to_string()),
    ];

    answers
        .into_iter()
        .find(|(keyword, _)| query.contains(*keyword))
        .map(|(_, answer)| answer)
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> String {
        tracing::info!("Searching web for: {}", query);
        match self.lookup(query).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Search fallback for '{}': {}", query, e);
                self.fallback(query, &e, &Local::now())
            }
        }
    }
}
