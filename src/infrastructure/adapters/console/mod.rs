//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use crate::domain::entities::IncomingMessage;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter for local development.
///
/// Every stdin line is a channel message from `sender` in `channel`.
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: String,
    channel: String,
    input: Lines<BufReader<Stdin>>,
}

impl ConsoleAdapter {
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                nick: nick.into(),
                name: "rehaiku-bot".to_string(),
            },
            sender: "console".to_string(),
            channel: "#console".to_string(),
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&mut self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) as {} in {}", self.sender, self.channel);
        Ok(())
    }

    async fn next_message(&mut self) -> Result<Option<IncomingMessage>, BotError> {
        loop {
            let Some(line) = self.input.next_line().await? else {
                return Ok(None);
            };
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            return Ok(Some(IncomingMessage::new(&self.sender, &self.channel, line)));
        }
    }

    async fn send_message(&mut self, _target: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
