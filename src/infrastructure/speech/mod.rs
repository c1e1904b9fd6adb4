//! Text-to-speech through a system speech command
//!
//! Best effort only. Replies are correct whether or not anything is spoken.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::entities::Effect;
use crate::domain::traits::EffectSink;
use crate::infrastructure::config::SpeechConfig;

/// Chosen speech engine, fixed for the process lifetime
#[derive(Debug, Clone, Default)]
pub struct Speaker {
    engine: Option<PathBuf>,
}

impl Speaker {
    /// Look on PATH for the configured engines, first found wins
    pub fn detect(config: &SpeechConfig) -> Self {
        if !config.enabled {
            tracing::info!("Text-to-speech disabled by configuration");
            return Self::disabled();
        }

        let engine = config.engines.iter().find_map(|name| find_on_path(name));
        match &engine {
            Some(path) => tracing::info!("Text-to-speech engine initialized: {}", path.display()),
            None => tracing::warn!("No speech engine found (tried {}), text-to-speech will be disabled", config.engines.join(", ")),
        }
        Self { engine }
    }

    pub fn disabled() -> Self {
        Self { engine: None }
    }

    pub fn with_engine(path: impl Into<PathBuf>) -> Self {
        Self { engine: Some(path.into()) }
    }

    pub fn available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&Path> {
        self.engine.as_deref()
    }

    /// Log the reply and queue it for speaking when an engine is present
    pub fn announce(&self, text: &str, sink: &dyn EffectSink) {
        tracing::info!("KAEL: {}", text);
        if self.available() {
            sink.submit(Effect::Speak(text.to_string()));
        }
    }
}

/// Run the engine on `text` and wait for it to finish
pub fn speak_blocking(engine: &Path, text: &str) -> std::io::Result<()> {
    tracing::debug!("Speaking with {}: {}", engine.display(), text);
    let status = Command::new(engine).arg(text).status()?;
    if !status.success() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{} exited with {}", engine.display(), status),
        ));
    }
    Ok(())
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", name));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}
