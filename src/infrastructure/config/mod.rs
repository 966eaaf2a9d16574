//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub irc: Option<IrcConfig>,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub nick: String,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Single character introducing a command
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Lines whose first character is listed here are never recorded
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IrcConfig {
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub channel: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CorpusConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConversationConfig {
    /// Pattern-match retries per chain step
    pub max_attempts: u32,
    /// Hard cap on directed lines in one chain
    pub max_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LeaderboardConfig {
    pub size: usize,
    /// Lines a nick needs before it shows up on boards
    pub min_lines: u64,
}

fn default_realname() -> String {
    "rehaiku-bot".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_ignore_prefixes() -> String {
    "!".to_string()
}

fn default_port() -> u16 {
    6667
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rehaiku.db"),
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            max_length: 100,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            size: 5,
            min_lines: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                nick: "rehaiku".to_string(),
                realname: default_realname(),
                prefix: default_prefix(),
                ignore_prefixes: default_ignore_prefixes(),
            },
            irc: None,
            corpus: CorpusConfig::default(),
            conversation: ConversationConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(nick) = std::env::var("BOT_NICK") {
            config.bot.nick = nick;
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(path) = std::env::var("CORPUS_PATH") {
            config.corpus.path = PathBuf::from(path);
        }

        if let (Ok(server), Ok(channel)) = (std::env::var("IRC_SERVER"), std::env::var("IRC_CHANNEL")) {
            config.irc = Some(IrcConfig {
                server,
                port: default_port(),
                channel,
            });
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.chars().count() != 1 {
            return Err(ConfigError::InvalidValue(format!(
                "prefix must be a single character, got {:?}",
                self.bot.prefix
            )));
        }
        if self.bot.nick.trim().is_empty() {
            return Err(ConfigError::InvalidValue("nick must not be empty".to_string()));
        }
        if self.conversation.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("max-attempts must be at least 1".to_string()));
        }
        if self.conversation.max_length == 0 {
            return Err(ConfigError::InvalidValue("max-length must be at least 1".to_string()));
        }
        if self.leaderboard.size == 0 {
            return Err(ConfigError::InvalidValue("leaderboard size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The command prefix as a character. Only valid after `validate`.
    pub fn prefix_char(&self) -> char {
        self.bot.prefix.chars().next().unwrap_or('!')
    }

    pub fn ignore_prefixes(&self) -> Vec<char> {
        self.bot.ignore_prefixes.chars().collect()
    }
}
