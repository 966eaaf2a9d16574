//! IRC adapter

mod line;

pub use line::IrcLine;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::application::errors::BotError;
use crate::domain::entities::IncomingMessage;
use crate::domain::traits::{Bot, BotInfo};
use crate::infrastructure::config::IrcConfig;

const CTCP_DELIM: char = '\x01';

/// Plain-TCP IRC client joined to a single channel
pub struct IrcAdapter {
    config: IrcConfig,
    info: BotInfo,
    reader: Option<Lines<BufReader<OwnedReadHalf>>>,
    writer: Option<OwnedWriteHalf>,
}

impl IrcAdapter {
    pub fn new(config: IrcConfig, nick: impl Into<String>, realname: impl Into<String>) -> Self {
        Self {
            config,
            info: BotInfo {
                nick: nick.into(),
                name: realname.into(),
            },
            reader: None,
            writer: None,
        }
    }

    async fn send_raw(&mut self, line: &str) -> Result<(), BotError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| BotError::Protocol("not connected".to_string()))?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\r\n").await?;
        Ok(())
    }

    /// React to a protocol line; returns a message when it is channel chatter
    async fn handle_line(&mut self, line: IrcLine) -> Result<Option<IncomingMessage>, BotError> {
        match line.command.as_str() {
            "PING" => {
                let token = line.params.first().cloned().unwrap_or_default();
                self.send_raw(&format!("PONG :{}", token)).await?;
            }
            "001" => {
                tracing::info!("Connected to {}", line.prefix.as_deref().unwrap_or(&self.config.server));
                let join = format!("JOIN {}", self.config.channel);
                self.send_raw(&join).await?;
            }
            "433" => {
                return Err(BotError::Protocol(format!("nick {} is already in use", self.info.nick)));
            }
            "JOIN" => {
                if line.source_nick() == Some(self.info.nick.as_str()) {
                    tracing::info!("Joined channel {}", line.params.first().map(String::as_str).unwrap_or(""));
                }
            }
            "ERROR" => {
                let reason = line.params.first().cloned().unwrap_or_default();
                return Err(BotError::Protocol(reason));
            }
            "PRIVMSG" => {
                let (Some(sender), [target, text, ..]) = (line.source_nick(), line.params.as_slice()) else {
                    return Ok(None);
                };
                // CTCP (ACTION, VERSION, ...) is not chat
                if text.starts_with(CTCP_DELIM) {
                    tracing::debug!("Ignoring CTCP from {}", sender);
                    return Ok(None);
                }
                let message = IncomingMessage::new(sender, target.as_str(), text.as_str());
                if message.is_channel() {
                    return Ok(Some(message));
                }
                // private messages are not recorded or answered
                tracing::debug!("Ignoring private message from {}", sender);
            }
            _ => {}
        }
        Ok(None)
    }
}

#[async_trait]
impl Bot for IrcAdapter {
    async fn start(&mut self) -> Result<(), BotError> {
        let address = format!("{}:{}", self.config.server, self.config.port);
        tracing::info!("Connecting to {}", address);

        let stream = TcpStream::connect(&address).await?;
        let (read, write) = stream.into_split();
        self.reader = Some(BufReader::new(read).lines());
        self.writer = Some(write);

        let nick = format!("NICK {}", self.info.nick);
        let user = format!("USER {} 0 * :{}", self.info.nick, self.info.name);
        self.send_raw(&nick).await?;
        self.send_raw(&user).await?;
        Ok(())
    }

    async fn next_message(&mut self) -> Result<Option<IncomingMessage>, BotError> {
        loop {
            let reader = self
                .reader
                .as_mut()
                .ok_or_else(|| BotError::Protocol("not connected".to_string()))?;
            let Some(raw) = reader.next_line().await? else {
                tracing::info!("Server closed the connection");
                return Ok(None);
            };

            let Some(line) = IrcLine::parse(&raw) else {
                tracing::debug!("Unparseable line: {}", raw);
                continue;
            };
            if let Some(message) = self.handle_line(line).await? {
                return Ok(Some(message));
            }
        }
    }

    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), BotError> {
        let text: String = text.chars().filter(|c| *c != '\r' && *c != '\n').collect();
        self.send_raw(&format!("PRIVMSG {} :{}", target, text)).await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    fn adapter_for(listener: &TcpListener) -> IrcAdapter {
        let port = listener.local_addr().unwrap().port();
        IrcAdapter::new(
            IrcConfig {
                server: "127.0.0.1".to_string(),
                port,
                channel: "#x".to_string(),
            },
            "rehaiku",
            "rehaiku-bot",
        )
    }

    #[tokio::test]
    async fn test_registers_joins_and_yields_channel_messages() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut adapter = adapter_for(&listener);

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();

            let mut received = Vec::new();
            received.push(lines.next_line().await.unwrap().unwrap());
            received.push(lines.next_line().await.unwrap().unwrap());

            write
                .write_all(
                    b":srv 001 rehaiku :Welcome\r\n\
                      PING :srv\r\n\
                      :carol!c@h PRIVMSG rehaiku :psst\r\n\
                      :alice!a@h PRIVMSG #x :hello everyone\r\n",
                )
                .await
                .unwrap();

            received.push(lines.next_line().await.unwrap().unwrap());
            received.push(lines.next_line().await.unwrap().unwrap());
            received.push(lines.next_line().await.unwrap().unwrap());
            received
        });

        adapter.start().await.unwrap();
        let message = adapter.next_message().await.unwrap().unwrap();
        assert_eq!(message, IncomingMessage::new("alice", "#x", "hello everyone"));

        adapter.send_message("#x", "bob has no history!\r\n").await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(
            received,
            vec![
                "NICK rehaiku",
                "USER rehaiku 0 * :rehaiku-bot",
                "JOIN #x",
                "PONG :srv",
                "PRIVMSG #x :bob has no history!",
            ]
        );
    }

    #[tokio::test]
    async fn test_ctcp_action_is_skipped() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut adapter = adapter_for(&listener);

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket
                .write_all(
                    b":alice!a@h PRIVMSG #x :\x01ACTION waves\x01\r\n\
                      :alice!a@h PRIVMSG #x :hello again\r\n",
                )
                .await
                .unwrap();
            socket
        });

        adapter.start().await.unwrap();
        let message = adapter.next_message().await.unwrap().unwrap();
        assert_eq!(message, IncomingMessage::new("alice", "#x", "hello again"));
        drop(server.await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_connection_ends_input() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut adapter = adapter_for(&listener);

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        adapter.start().await.unwrap_or(());
        server.await.unwrap();
        assert!(adapter.next_message().await.unwrap_or(None).is_none());
    }

    #[tokio::test]
    async fn test_nick_in_use_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut adapter = adapter_for(&listener);

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket
                .write_all(b":srv 433 * rehaiku :Nickname is already in use\r\n")
                .await
                .unwrap();
            socket
        });

        adapter.start().await.unwrap();
        let result = adapter.next_message().await;
        assert!(matches!(result, Err(BotError::Protocol(_))));
        drop(server.await.unwrap());
    }

    #[tokio::test]
    async fn test_send_before_start_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut adapter = adapter_for(&listener);
        assert!(adapter.send_message("#x", "hi").await.is_err());
    }
}
