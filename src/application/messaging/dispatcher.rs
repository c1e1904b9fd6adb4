//! Intent dispatcher - routes a command to its handler and returns the reply

use std::sync::Arc;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Url;

use super::rules::{self, classify};
use crate::application::responses::{self, pick};
use crate::domain::entities::{Command, Effect, Intent};
use crate::domain::traits::{EffectSink, WebSearch};
use crate::infrastructure::config::{Config, Mode};
use crate::infrastructure::llm::LlmResponder;
use crate::infrastructure::providers::{NewsProvider, WeatherProvider};

const GOOGLE_SEARCH: &str = "https://www.google.com/search";

/// Reply text together with the rule that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

impl Reply {
    fn new(intent: Intent, text: impl Into<String>) -> Self {
        Self { intent, text: text.into() }
    }
}

/// Maps a command to one reply string. Providers never fail, so neither
/// does dispatch.
pub struct IntentDispatcher {
    weather: WeatherProvider,
    news: NewsProvider,
    search: Arc<dyn WebSearch>,
    llm: LlmResponder,
    effects: Arc<dyn EffectSink>,
    mode: Mode,
}

impl IntentDispatcher {
    /// Online mode with every simulated provider enabled and no LLM
    pub fn new(search: Arc<dyn WebSearch>, effects: Arc<dyn EffectSink>) -> Self {
        let mode = Mode::Online;
        Self {
            weather: WeatherProvider::new(true, mode),
            news: NewsProvider::new(true, mode),
            search,
            llm: LlmResponder::disabled(mode),
            effects,
            mode,
        }
    }

    pub fn from_config(config: &Config, search: Arc<dyn WebSearch>, effects: Arc<dyn EffectSink>) -> Self {
        Self {
            weather: WeatherProvider::from_config(config),
            news: NewsProvider::from_config(config),
            search,
            llm: LlmResponder::from_config(config),
            effects,
            mode: config.mode,
        }
    }

    pub fn with_weather(mut self, weather: WeatherProvider) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_news(mut self, news: NewsProvider) -> Self {
        self.news = news;
        self
    }

    pub fn with_llm(mut self, llm: LlmResponder) -> Self {
        self.llm = llm;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search(&self) -> &Arc<dyn WebSearch> {
        &self.search
    }

    pub fn llm(&self) -> &LlmResponder {
        &self.llm
    }

    pub fn weather(&self) -> &WeatherProvider {
        &self.weather
    }

    pub fn news(&self) -> &NewsProvider {
        &self.news
    }

    /// Reply to `command` using fresh randomness and the local clock
    pub async fn dispatch(&self, command: &Command) -> String {
        let mut rng = StdRng::from_entropy();
        let now = Local::now();
        self.dispatch_with(command, &mut rng, &now).await.text
    }

    /// Deterministic form of `dispatch` for a given rng and clock
    pub async fn dispatch_with<R: Rng + Send>(
        &self,
        command: &Command,
        rng: &mut R,
        now: &DateTime<Local>,
    ) -> Reply {
        let intent = classify(command);
        tracing::debug!("Command '{}' matched {}", command, intent);

        match intent {
            Intent::OpenApp => {
                let app = rules::app_name(command);
                if !app.is_empty() {
                    self.effects.submit(Effect::LaunchApp(app.clone()));
                }
                Reply::new(intent, format!("Opening {}", app))
            }
            Intent::Search => {
                let query = rules::search_query(command);
                if rules::wants_browser(command) {
                    if let Some(url) = google_search_url(&query) {
                        self.effects.submit(Effect::OpenBrowser(url));
                    }
                    Reply::new(intent, format!("Searching Google for {}", query))
                } else {
                    Reply::new(intent, self.search.search(&query).await)
                }
            }
            Intent::Weather => match rules::weather_location(command) {
                Some(location) => Reply::new(intent, self.weather.report(&location, rng)),
                None => Reply::new(intent, responses::NEED_LOCATION),
            },
            Intent::News => {
                let topic = rules::news_topic(command).unwrap_or_default();
                Reply::new(intent, self.news.headlines(&topic, rng))
            }
            Intent::Time => Reply::new(intent, responses::time_reply(now)),
            Intent::Date => Reply::new(intent, responses::date_reply(now)),
            Intent::Greeting => Reply::new(intent, pick(&responses::GREETINGS, rng)),
            Intent::Identity => Reply::new(intent, responses::IDENTITY),
            Intent::Joke => Reply::new(intent, pick(&responses::JOKES, rng)),
            Intent::Help => Reply::new(intent, responses::HELP),
            Intent::Thanks => Reply::new(intent, pick(&responses::THANKS, rng)),
            Intent::Farewell => Reply::new(intent, pick(&responses::FAREWELLS, rng)),
            Intent::SystemStatus => Reply::new(intent, responses::SYSTEM_STATUS),
            Intent::Fallback => Reply::new(intent, self.fallback(command, rng).await),
        }
    }

    /// LLM for questions and longer sentences, then web search, then a shrug
    async fn fallback<R: Rng + Send>(&self, command: &Command, rng: &mut R) -> String {
        let is_question = command.is_question();

        if self.llm.is_enabled() && (is_question || command.word_count() > 3) {
            let prompt = responses::persona_prompt(command.as_str());
            return self.llm.ask(&prompt, responses::FALLBACK_TEMPERATURE).await;
        }

        if is_question {
            return self.search.search(command.as_str()).await;
        }

        pick(responses::unknown_table(self.mode), rng).to_string()
    }
}

fn google_search_url(query: &str) -> Option<String> {
    match Url::parse_with_params(GOOGLE_SEARCH, &[("q", query)]) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!("Could not build search URL for '{}': {}", query, e);
            None
        }
    }
}
