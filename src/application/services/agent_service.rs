use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::IncomingMessage;
use crate::domain::traits::Bot;

/// Drives the bot: one message in, its replies out, then the next message
pub struct AgentService<B: Bot> {
    bot: B,
    dispatcher: MessageDispatcher,
}

impl<B: Bot> AgentService<B> {
    pub fn new(bot: B, dispatcher: MessageDispatcher) -> Self {
        Self { bot, dispatcher }
    }

    #[cfg(test)]
    pub fn bot(&self) -> &B {
        &self.bot
    }

    /// Handle a single message and send its replies to the message target.
    /// Returns how many lines were sent.
    pub async fn process(&mut self, message: IncomingMessage) -> Result<usize, BotError> {
        let replies = match self.dispatcher.process(&message) {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!("Failed to handle message from {}: {}", message.sender, e);
                return Ok(0);
            }
        };

        for line in &replies {
            self.bot.send_message(&message.target, line).await?;
        }
        Ok(replies.len())
    }

    /// Run until the adapter runs out of messages
    pub async fn run(&mut self) -> Result<(), BotError> {
        self.bot.start().await?;
        let info = self.bot.bot_info();
        tracing::info!("{} is listening", info.nick);

        while let Some(message) = self.bot.next_message().await? {
            tracing::debug!("Got message {:?} (from {}, to {})", message.text, message.sender, message.target);
            self.process(message).await?;
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }
}
