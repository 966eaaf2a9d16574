//! Middleware system for command handling pipeline

use std::collections::HashMap;
use std::sync::Arc;
use rand::rngs::StdRng;

use crate::application::errors::{BotError, StatError};
use crate::domain::entities::{Command, IncomingMessage};
use crate::infrastructure::stats::{format_score, round2};
use super::dispatcher::Services;

/// Context key a stat handler uses to name its metric
pub const METRIC_KEY: &str = "metric";

/// Handler result: the lines to send back, in order
pub type HandlerResult = Result<Vec<String>, BotError>;

/// Handler function type. Middleware chains produce the same shape.
pub type Handler = Arc<dyn Fn(&mut Context<'_>) -> HandlerResult + Send + Sync>;

/// Box a closure or fn item as a `Handler`
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Context passed through middleware chain
pub struct Context<'a> {
    pub message: &'a IncomingMessage,
    pub command: &'a Command,
    pub services: &'a Services,
    pub rng: &'a mut StdRng,
    /// Nick the command is about, once resolved
    pub subject: Option<String>,
    pub data: HashMap<String, String>,
}

impl<'a> Context<'a> {
    pub fn new(
        message: &'a IncomingMessage,
        command: &'a Command,
        services: &'a Services,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            message,
            command,
            services,
            rng,
            subject: None,
            data: HashMap::new(),
        }
    }

    /// Resolved subject, falling back to the sender
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(&self.message.sender)
    }

    /// Get data from context
    pub fn get(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    /// Set data in context
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }
}

/// Middleware trait - stages that wrap a handler and may short-circuit it
pub trait Middleware: Send + Sync {
    fn process(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult;
}

/// Remaining stages plus the handler at the end of the chain
pub struct Next<'n> {
    remaining: &'n [Arc<dyn Middleware>],
    handler: &'n Handler,
}

impl<'n> Next<'n> {
    pub fn new(remaining: &'n [Arc<dyn Middleware>], handler: &'n Handler) -> Self {
        Self { remaining, handler }
    }

    /// Process remaining middleware, then the handler
    pub fn run(self, ctx: &mut Context<'_>) -> HandlerResult {
        match self.remaining.split_first() {
            Some((first, rest)) => first.process(ctx, Next::new(rest, self.handler)),
            None => (self.handler)(ctx),
        }
    }
}

/// Middleware chain builder
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Wrap `inner` so every call runs through the chain first
    pub fn wrap(self, inner: Handler) -> Handler {
        let middlewares = self.middlewares;
        handler(move |ctx| Next::new(&middlewares, &inner).run(ctx))
    }
}

/// Derives the subject nick from the arguments.
///
/// No arguments means the sender, one argument is the nick itself, anything
/// else drops the command without a reply.
pub struct NickResolution;

impl Middleware for NickResolution {
    fn process(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult {
        let subject = {
            let tokens = ctx.command.tokens();
            match tokens.as_slice() {
                [] => ctx.message.sender.clone(),
                [nick] => nick.to_string(),
                _ => {
                    tracing::debug!("{}: expected at most one nick, got {}", ctx.command.name, tokens.len());
                    return Ok(Vec::new());
                }
            }
        };
        ctx.subject = Some(subject);
        next.run(ctx)
    }
}

/// Reply templates for stat commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTemplate {
    Collected,
    Pretentious,
    PercentLol,
    Spammy,
}

impl StatTemplate {
    pub fn render(&self, value: f64, nick: &str) -> String {
        match self {
            StatTemplate::Collected => {
                format!("I have collected {:.0} lines of dialog from {}.", value, nick)
            }
            StatTemplate::Pretentious => {
                format!("{}'s pretentiousness level is {}", nick, format_score(value))
            }
            StatTemplate::PercentLol => format!("{}'s lol percentage is {}", nick, format_score(value)),
            StatTemplate::Spammy => format!("{}'s spamminess is {}", nick, format_score(value)),
        }
    }
}

/// Turns the metric key left by the handler into a formatted reply
pub struct StatFormat {
    template: StatTemplate,
}

impl StatFormat {
    pub fn new(template: StatTemplate) -> Self {
        Self { template }
    }
}

impl Middleware for StatFormat {
    fn process(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult {
        let mut lines = next.run(ctx)?;
        let Some(metric) = ctx.get(METRIC_KEY).cloned() else {
            return Ok(lines);
        };

        let nick = ctx.subject().to_string();
        match ctx.services.stats.compute(&metric, ctx.services.corpus.as_ref(), &nick) {
            Ok(Some(value)) => {
                lines.push(self.template.render(round2(value), &nick));
                Ok(lines)
            }
            Ok(None) => {
                tracing::debug!("no {} data for {}", metric, nick);
                Ok(lines)
            }
            Err(StatError::UnknownMetric(name)) => {
                tracing::debug!("unknown metric {}", name);
                Ok(lines)
            }
            Err(StatError::Storage(e)) => Err(e.into()),
        }
    }
}

/// Logging middleware for debugging
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn process(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult {
        tracing::debug!("[{}] {} ({})", ctx.message.target, ctx.command.name, ctx.command.args);

        let result = next.run(ctx);

        match &result {
            Ok(lines) => {
                tracing::debug!("[{}] {} produced {} lines", ctx.message.target, ctx.command.name, lines.len());
            }
            Err(e) => {
                tracing::warn!("[{}] {} failed: {}", ctx.message.target, ctx.command.name, e);
            }
        }

        result
    }
}
