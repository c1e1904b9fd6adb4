//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use crate::application::errors::ConfigError;
use crate::infrastructure::llm::LLMConfig;

/// Server configuration, built once at startup and shared read-only
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub features: FeatureConfig,
    pub mode: Mode,
    pub llm: LLMConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding a bundled front end, served for non-API paths
    pub static_dir: Option<PathBuf>,
}

/// Feature toggles
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FeatureConfig {
    pub search: bool,
    pub news: bool,
    pub weather: bool,
    pub llm: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Speech binaries to look for on PATH, first found wins
    pub engines: Vec<String>,
}

/// Deployment mode. Offline replies label themselves as offline and fall back
/// to built-in knowledge instead of suggesting a web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Online,
    Offline,
}

impl Mode {
    pub fn is_offline(&self) -> bool {
        matches!(self, Mode::Offline)
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(Mode::Online),
            "offline" | "standalone" => Ok(Mode::Offline),
            other => Err(ConfigError::InvalidValue(format!("unknown mode '{}'", other))),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Online => f.write_str("online"),
            Mode::Offline => f.write_str("offline"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            features: FeatureConfig::default(),
            mode: Mode::Online,
            llm: LLMConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            search: true,
            news: true,
            weather: true,
            llm: true,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engines: vec![
                "spd-say".to_string(),
                "espeak-ng".to_string(),
                "espeak".to_string(),
                "say".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Layer process environment variables over the current values
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Layer variables from `lookup` over the current values
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).map(|v| v.trim().eq_ignore_ascii_case("true"));

        if let Some(host) = lookup("KAEL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("KAEL_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("KAEL_PORT={}", port)))?;
        }
        if let Some(dir) = lookup("KAEL_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(mode) = lookup("KAEL_MODE") {
            self.mode = mode.parse()?;
        }

        if let Some(on) = flag("ENABLE_WEB_SEARCH") {
            self.features.search = on;
        }
        if let Some(on) = flag("ENABLE_NEWS") {
            self.features.news = on;
        }
        if let Some(on) = flag("ENABLE_WEATHER") {
            self.features.weather = on;
        }
        if let Some(on) = flag("ENABLE_GEMINI") {
            self.features.llm = on;
        }
        if let Some(on) = flag("ENABLE_TTS") {
            self.speech.enabled = on;
        }

        self.llm.apply_vars(&lookup);
        Ok(())
    }

    /// Resolve settings that depend on each other. Call once before sharing.
    pub fn finalize(mut self) -> Self {
        if self.features.llm && !self.llm.has_api_key() {
            tracing::warn!("Gemini API is enabled but no API key is provided. Set GEMINI_API_KEY to enable it.");
            self.features.llm = false;
        } else {
            tracing::info!("Gemini API {}", if self.features.llm { "enabled" } else { "disabled" });
        }

        if self.mode.is_offline() && self.speech.enabled {
            tracing::info!("Offline mode: text-to-speech disabled");
            self.speech.enabled = false;
        }

        self
    }

    /// LLM feature is on and a credential is present
    pub fn llm_enabled(&self) -> bool {
        self.features.llm && self.llm.has_api_key()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
