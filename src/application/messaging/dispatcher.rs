//! Message dispatcher - Routes messages to the corpus or to command handlers

use std::collections::HashMap;
use std::sync::Arc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::application::services::{ConversationChainer, LeaderboardRanker};
use crate::domain::entities::{BoardMode, Classification, Command, CommandName, IncomingMessage};
use crate::domain::traits::CorpusStore;
use crate::infrastructure::directory::UserDirectory;
use crate::infrastructure::stats::StatEngine;
use super::middleware::{
    handler, Context, Handler, HandlerResult, LoggingMiddleware, MiddlewareChain,
    NickResolution, StatFormat, StatTemplate, METRIC_KEY,
};
use super::parser::MessageClassifier;

const HAIKU_REFUSAL: &str = "I'm sorry, Dave. I'm afraid I can't do that.";

/// Collaborators available to every handler
pub struct Services {
    pub corpus: Arc<dyn CorpusStore>,
    pub stats: StatEngine,
    pub directory: UserDirectory,
    pub chainer: ConversationChainer,
    pub ranker: LeaderboardRanker,
}

impl Services {
    pub fn new(corpus: Arc<dyn CorpusStore>) -> Self {
        Self {
            corpus,
            stats: StatEngine::standard(),
            directory: UserDirectory::default(),
            chainer: ConversationChainer::default(),
            ranker: LeaderboardRanker::default(),
        }
    }

    pub fn with_stats(mut self, stats: StatEngine) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_directory(mut self, directory: UserDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_chainer(mut self, chainer: ConversationChainer) -> Self {
        self.chainer = chainer;
        self
    }

    pub fn with_ranker(mut self, ranker: LeaderboardRanker) -> Self {
        self.ranker = ranker;
        self
    }
}

/// Message dispatcher - records corpus lines and runs commands
pub struct MessageDispatcher {
    classifier: MessageClassifier,
    services: Services,
    handlers: HashMap<CommandName, Handler>,
    rng: StdRng,
}

impl MessageDispatcher {
    pub fn new(classifier: MessageClassifier, services: Services) -> Self {
        Self {
            classifier,
            services,
            handlers: default_handlers(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the random source, for reproducible conversations
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Process one incoming line and return the replies to send, in order
    pub fn process(&mut self, message: &IncomingMessage) -> HandlerResult {
        match self.classifier.classify(&message.text) {
            Classification::Command(command) => self.dispatch(&command, message),
            Classification::Corpus => {
                tracing::debug!("recording line from {} in {}", message.sender, message.target);
                self.services
                    .corpus
                    .append(&message.sender, &message.target, &message.text)?;
                Ok(Vec::new())
            }
            Classification::Ignored => {
                tracing::debug!("ignoring line from {}", message.sender);
                Ok(Vec::new())
            }
        }
    }

    /// Run a recognized command
    pub fn dispatch(&mut self, command: &Command, message: &IncomingMessage) -> HandlerResult {
        let Some(handler) = self.handlers.get(&command.name).cloned() else {
            tracing::debug!("no handler registered for {}", command.name);
            return Ok(Vec::new());
        };

        let mut ctx = Context::new(message, command, &self.services, &mut self.rng);
        handler(&mut ctx)
    }
}

fn nick_command() -> MiddlewareChain {
    MiddlewareChain::new().add(LoggingMiddleware).add(NickResolution)
}

fn stat_command(template: StatTemplate) -> MiddlewareChain {
    nick_command().add(StatFormat::new(template))
}

/// The static command table
fn default_handlers() -> HashMap<CommandName, Handler> {
    let plain = || MiddlewareChain::new().add(LoggingMiddleware);

    let mut handlers = HashMap::new();
    handlers.insert(
        CommandName::Stats,
        stat_command(StatTemplate::Collected).wrap(handler(|ctx| metric(ctx, "stats"))),
    );
    handlers.insert(CommandName::Haiku, plain().wrap(handler(do_haiku)));
    handlers.insert(CommandName::Replay, nick_command().wrap(handler(do_replay)));
    handlers.insert(CommandName::Conv, nick_command().wrap(handler(do_conv)));
    handlers.insert(
        CommandName::Pretentious,
        stat_command(StatTemplate::Pretentious).wrap(handler(|ctx| metric(ctx, "pretentious"))),
    );
    handlers.insert(
        CommandName::PercentLol,
        stat_command(StatTemplate::PercentLol).wrap(handler(|ctx| metric(ctx, "percentlol"))),
    );
    handlers.insert(
        CommandName::Spammy,
        stat_command(StatTemplate::Spammy).wrap(handler(|ctx| metric(ctx, "spammy"))),
    );
    handlers.insert(
        CommandName::Leaderboard,
        plain().wrap(handler(|ctx| do_board(ctx, BoardMode::Leaderboard))),
    );
    handlers.insert(
        CommandName::Loserboard,
        plain().wrap(handler(|ctx| do_board(ctx, BoardMode::Loserboard))),
    );
    handlers
}

/// Stat handlers only name their metric; `StatFormat` does the rest
fn metric(ctx: &mut Context<'_>, name: &str) -> HandlerResult {
    ctx.set(METRIC_KEY, name);
    Ok(Vec::new())
}

fn do_haiku(ctx: &mut Context<'_>) -> HandlerResult {
    if !ctx.command.tokens().is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![HAIKU_REFUSAL.to_string()])
}

fn do_replay(ctx: &mut Context<'_>) -> HandlerResult {
    let nick = ctx.subject();
    let line = ctx.services.corpus.random_line(nick, &ctx.message.target)?;
    match line {
        Some(line) => Ok(vec![format!("<{}> {}", nick, line)]),
        None => Ok(vec![format!("{} has no history!", nick)]),
    }
}

fn do_conv(ctx: &mut Context<'_>) -> HandlerResult {
    let nick = ctx.subject().to_string();
    let services = ctx.services;
    let lines = services
        .chainer
        .chain(services.corpus.as_ref(), &mut *ctx.rng, &nick, &ctx.message.target)?;
    Ok(lines)
}

fn do_board(ctx: &mut Context<'_>, mode: BoardMode) -> HandlerResult {
    let tokens = ctx.command.tokens();
    let [metric] = tokens.as_slice() else {
        return Ok(Vec::new());
    };

    let services = ctx.services;
    let corpus = services.corpus.as_ref();
    let users = services.directory.active_users(corpus)?;
    match services.ranker.rank(corpus, &services.stats, &users, metric, mode)? {
        Some(entries) => Ok(LeaderboardRanker::render(mode, metric, &entries)),
        None => Ok(Vec::new()),
    }
}
