use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::{BotError, ConfigError};
use application::messaging::{MessageClassifier, MessageDispatcher, Services};
use application::services::{AgentService, ConversationChainer, LeaderboardRanker};
use domain::traits::CorpusStore;
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::irc::IrcAdapter;
use infrastructure::config::{Config, IrcConfig};
use infrastructure::database::SqliteCorpus;
use infrastructure::directory::UserDirectory;
use infrastructure::stats::StatEngine;
use infrastructure::storage::MemoryCorpus;

#[derive(Parser)]
#[command(name = "rehaiku-bot")]
#[command(about = "A channel bot that remembers what everyone said", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// IRC server (overrides config)
        #[arg(long)]
        server: Option<String>,

        /// Channel to join (overrides config)
        #[arg(long)]
        channel: Option<String>,

        /// Nick to speak as in console mode
        #[arg(long, default_value = "console")]
        sender: String,

        /// Keep the corpus in memory instead of the configured database
        #[arg(long)]
        volatile: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            server,
            channel,
            sender,
            volatile,
        } => run_bot(&cli.config, server, channel, &sender, volatile),
        Commands::Version => {
            println!("rehaiku-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        Config::load(path)
    } else {
        tracing::info!("No config at {}, using environment and defaults", path.display());
        let config = Config::load_env();
        config.validate()?;
        Ok(config)
    }
}

fn run_bot(
    config_path: &Path,
    server: Option<String>,
    channel: Option<String>,
    sender: &str,
    volatile: bool,
) -> Result<(), BotError> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, server, channel)?;

    tracing::info!("Starting rehaiku-bot as {}", config.bot.nick);

    let corpus: Arc<dyn CorpusStore> = if volatile {
        tracing::warn!("Using in-memory corpus, nothing will be saved");
        Arc::new(MemoryCorpus::new())
    } else {
        tracing::info!("Opening corpus at {}", config.corpus.path.display());
        Arc::new(SqliteCorpus::open(&config.corpus.path)?)
    };

    let dispatcher = build_dispatcher(&config, corpus);
    tracing::info!(
        "Corpus holds {} lines, commands start with {}",
        dispatcher.services().corpus.total_lines()?,
        config.prefix_char()
    );

    let rt = tokio::runtime::Runtime::new()?;
    match config.irc.clone() {
        Some(irc) => rt.block_on(async {
            let bot = IrcAdapter::new(irc, &config.bot.nick, &config.bot.realname);
            AgentService::new(bot, dispatcher).run().await
        }),
        None => rt.block_on(async {
            // Run console bot (dev mode)
            let bot = ConsoleAdapter::new(&config.bot.nick).with_sender(sender);
            AgentService::new(bot, dispatcher).run().await
        }),
    }
}

fn apply_overrides(config: &mut Config, server: Option<String>, channel: Option<String>) -> Result<(), ConfigError> {
    match (config.irc.as_mut(), server, channel) {
        (Some(irc), server, channel) => {
            if let Some(server) = server {
                irc.server = server;
            }
            if let Some(channel) = channel {
                irc.channel = channel;
            }
        }
        (None, Some(server), Some(channel)) => {
            config.irc = Some(IrcConfig {
                server,
                port: 6667,
                channel,
            });
        }
        (None, None, None) => {}
        (None, _, _) => {
            return Err(ConfigError::InvalidValue(
                "--server and --channel must be given together when the config has no irc section".to_string(),
            ));
        }
    }
    Ok(())
}

fn build_dispatcher(config: &Config, corpus: Arc<dyn CorpusStore>) -> MessageDispatcher {
    let classifier = MessageClassifier::new(config.prefix_char(), config.ignore_prefixes());
    let services = Services::new(corpus)
        .with_stats(StatEngine::standard())
        .with_directory(UserDirectory::new(config.leaderboard.min_lines))
        .with_chainer(ConversationChainer::new(
            config.conversation.max_attempts,
            config.conversation.max_length,
        ))
        .with_ranker(LeaderboardRanker::new(config.leaderboard.size));
    MessageDispatcher::new(classifier, services)
}

fn init_config(path: &Path) -> Result<(), BotError> {
    if path.exists() {
        return Err(BotError::Config(ConfigError::InvalidValue(format!(
            "{} already exists",
            path.display()
        ))));
    }
    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::IncomingMessage;

    #[test]
    fn test_overrides_create_irc_section() {
        let mut config = Config::default();
        apply_overrides(&mut config, Some("irc.example.net".into()), Some("#x".into())).unwrap();
        let irc = config.irc.unwrap();
        assert_eq!(irc.server, "irc.example.net");
        assert_eq!(irc.channel, "#x");
    }

    #[test]
    fn test_half_override_is_rejected() {
        let mut config = Config::default();
        assert!(apply_overrides(&mut config, Some("irc.example.net".into()), None).is_err());
        assert!(apply_overrides(&mut config, None, None).is_ok());
    }

    #[test]
    fn test_dispatcher_uses_configured_prefix() {
        let mut config = Config::default();
        config.bot.prefix = "@".to_string();
        config.bot.ignore_prefixes = "!".to_string();
        let corpus = Arc::new(MemoryCorpus::with_seed(1));
        let mut dispatcher = build_dispatcher(&config, corpus.clone());

        let replies = dispatcher
            .process(&IncomingMessage::new("alice", "#x", "@haiku"))
            .unwrap();
        assert_eq!(replies.len(), 1);

        dispatcher
            .process(&IncomingMessage::new("alice", "#x", "!haiku"))
            .unwrap();
        assert_eq!(corpus.total_lines().unwrap(), 0);
    }

    #[test]
    fn test_init_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        init_config(&path).unwrap();
        assert!(Config::load(&path).is_ok());
        assert!(init_config(&path).is_err());
    }
}
