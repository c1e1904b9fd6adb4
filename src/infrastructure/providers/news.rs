//! Simulated news headlines

use rand::seq::SliceRandom;
use rand::Rng;

use crate::infrastructure::config::{Config, Mode};

/// Headlines per reply
pub const HEADLINE_COUNT: usize = 3;

const GENERAL: [&str; 5] = [
    "Scientists discover new renewable energy source that could revolutionize power generation.",
    "Global tech companies announce collaboration on AI safety standards.",
    "New study suggests regular exercise may improve cognitive function more than previously thought.",
    "Space agency announces plans for the next lunar mission with international partners.",
    "Breakthrough in quantum computing achieved by university researchers.",
];

const TECHNOLOGY: [&str; 5] = [
    "New smartphone with revolutionary battery technology unveiled today.",
    "Major software company releases significant update to its operating system.",
    "Artificial intelligence system beats human experts in complex problem-solving competition.",
    "Tech startup receives record funding for innovative augmented reality platform.",
    "New cybersecurity threat identified, experts recommend immediate system updates.",
];

const SCIENCE: [&str; 5] = [
    "Researchers identify potential new treatment for common neurological disorder.",
    "New species of deep-sea creatures discovered in ocean exploration mission.",
    "Climate scientists report unexpected changes in global weather patterns.",
    "Astronomers observe unusual stellar phenomenon never before documented.",
    "Breakthrough in renewable materials could reduce plastic waste significantly.",
];

/// Headline table chosen from a free-text topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsTopic {
    General,
    Technology,
    Science,
}

impl NewsTopic {
    /// `tech` wins over `science`; anything else is general
    pub fn from_topic(topic: &str) -> Self {
        let topic = topic.to_lowercase();
        if topic.contains("tech") {
            NewsTopic::Technology
        } else if topic.contains("science") {
            NewsTopic::Science
        } else {
            NewsTopic::General
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NewsTopic::General => "general",
            NewsTopic::Technology => "technology",
            NewsTopic::Science => "science",
        }
    }

    pub fn headlines(&self) -> &'static [&'static str] {
        match self {
            NewsTopic::General => &GENERAL,
            NewsTopic::Technology => &TECHNOLOGY,
            NewsTopic::Science => &SCIENCE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsProvider {
    enabled: bool,
    mode: Mode,
}

impl NewsProvider {
    pub fn new(enabled: bool, mode: Mode) -> Self {
        Self { enabled, mode }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.features.news, config.mode)
    }

    /// Numbered list of distinct headlines. An empty topic means general news.
    pub fn headlines<R: Rng>(&self, topic: &str, rng: &mut R) -> String {
        if !self.enabled {
            return match self.mode {
                Mode::Online => "News retrieval is currently disabled. Would you like me to enable this feature?",
                Mode::Offline => "News retrieval is currently disabled.",
            }
            .to_string();
        }

        let topic = NewsTopic::from_topic(topic);
        let table = topic.headlines();
        let selected: Vec<&str> = table
            .choose_multiple(rng, HEADLINE_COUNT.min(table.len()))
            .copied()
            .collect();
        tracing::info!("Simulated {} news: {} headlines", topic.name(), selected.len());

        let mut text = match self.mode {
            Mode::Online => format!("Here are the latest {} headlines:\n\n", topic.name()),
            Mode::Offline => format!("I'm in offline mode, so here are some simulated {} headlines:\n\n", topic.name()),
        };
        for (i, item) in selected.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, item));
        }
        text.push_str("\nThis is simulated news. To get real news updates, you would need to integrate with a news API.");
        text
    }
}
