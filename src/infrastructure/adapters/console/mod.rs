//! Console adapter for development/testing

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::application::messaging::{classify, IntentDispatcher};
use crate::domain::entities::{Command, Intent};
use crate::domain::traits::EffectSink;
use crate::infrastructure::speech::Speaker;

/// Line-oriented REPL over the same dispatcher the HTTP API uses
pub struct ConsoleAdapter {
    dispatcher: Arc<IntentDispatcher>,
    speaker: Arc<Speaker>,
    effects: Arc<dyn EffectSink>,
    prompt: String,
}

impl ConsoleAdapter {
    pub fn new(dispatcher: Arc<IntentDispatcher>, speaker: Arc<Speaker>, effects: Arc<dyn EffectSink>) -> Self {
        Self {
            dispatcher,
            speaker,
            effects,
            prompt: "> ".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Run on stdin/stdout until a farewell or end of input
    pub async fn run(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.run_with(stdin, &mut stdout).await
    }

    pub async fn run_with<R, W>(&self, input: R, output: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Starting console session ({} mode)", self.dispatcher.mode());
        let mut lines = input.lines();

        loop {
            output.write_all(self.prompt.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };

            let reply = self.dispatcher.dispatch(&command).await;
            self.speaker.announce(&reply, self.effects.as_ref());
            output.write_all(format!("[KAEL] {}\n", reply).as_bytes()).await?;

            if classify(&command) == Intent::Farewell {
                break;
            }
        }

        output.flush().await?;
        tracing::info!("Console session ended");
        Ok(())
    }
}
