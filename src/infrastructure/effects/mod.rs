//! Fire-and-forget side effects
//!
//! Effects go onto an unbounded channel drained by one worker task. Each
//! effect runs on the blocking pool; its outcome is logged and dropped.

use std::path::PathBuf;
use std::process::Command;
use tokio::sync::mpsc;

use crate::domain::entities::Effect;
use crate::domain::traits::EffectSink;
use crate::infrastructure::speech::{self, Speaker};

/// Handle to the effect worker. Cheap to clone.
#[derive(Clone)]
pub struct EffectQueue {
    sender: mpsc::UnboundedSender<Effect>,
}

impl EffectQueue {
    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn start(speaker: &Speaker) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let engine = speaker.engine().map(|p| p.to_path_buf());
        tokio::spawn(run(receiver, engine));
        Self { sender }
    }
}

impl EffectSink for EffectQueue {
    fn submit(&self, effect: Effect) {
        tracing::debug!("Queueing effect: {:?}", effect);
        if let Err(e) = self.sender.send(effect) {
            tracing::warn!("Effect worker gone, dropping {}", e.0.kind());
        }
    }
}

async fn run(mut receiver: mpsc::UnboundedReceiver<Effect>, engine: Option<PathBuf>) {
    while let Some(effect) = receiver.recv().await {
        let engine = engine.clone();
        tokio::task::spawn_blocking(move || {
            let kind = effect.kind();
            if let Err(e) = execute(effect, engine) {
                tracing::warn!("Effect {} failed: {}", kind, e);
            }
        });
    }
    tracing::debug!("Effect worker stopped");
}

fn execute(effect: Effect, engine: Option<PathBuf>) -> std::io::Result<()> {
    match effect {
        Effect::LaunchApp(app) => launch_app(&app),
        Effect::OpenBrowser(url) => {
            tracing::info!("Opening browser: {}", url);
            webbrowser::open(&url)
        }
        Effect::Speak(text) => match engine {
            Some(engine) => speech::speak_blocking(&engine, &text),
            None => Ok(()),
        },
    }
}

/// Hand an application name to the platform launcher and reap it. Runs on
/// the blocking pool, so waiting never delays a reply.
fn launch_app(app: &str) -> std::io::Result<()> {
    tracing::info!("Launching application: {}", app);

    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", app]);
        c
    };

    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = Command::new("open");
        c.args(["-a", app]);
        c
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut cmd = {
        let mut parts = app.split_whitespace();
        let program = parts.next().unwrap_or(app);
        let mut c = Command::new(program);
        c.args(parts);
        c
    };

    let status = cmd.spawn()?.wait()?;
    if !status.success() {
        tracing::warn!("Application {} exited with {}", app, status);
    }
    Ok(())
}
