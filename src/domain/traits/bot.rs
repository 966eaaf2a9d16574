use async_trait::async_trait;
use crate::domain::entities::IncomingMessage;
use crate::application::errors::BotError;

/// Bot trait - abstraction for chat network adapters
#[async_trait]
pub trait Bot: Send {
    /// Connect and prepare to receive messages
    async fn start(&mut self) -> Result<(), BotError>;

    /// Wait for the next message addressed to a channel. `None` means the
    /// connection or input has ended.
    async fn next_message(&mut self) -> Result<Option<IncomingMessage>, BotError>;

    /// Send one line to a channel or user
    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub nick: String,
    pub name: String,
}
