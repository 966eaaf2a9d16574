use std::fmt;

/// The fixed command vocabulary understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Stats,
    Haiku,
    Replay,
    Conv,
    Pretentious,
    Leaderboard,
    Loserboard,
    PercentLol,
    Spammy,
}

impl CommandName {
    pub const ALL: [CommandName; 9] = [
        CommandName::Stats,
        CommandName::Haiku,
        CommandName::Replay,
        CommandName::Conv,
        CommandName::Pretentious,
        CommandName::Leaderboard,
        CommandName::Loserboard,
        CommandName::PercentLol,
        CommandName::Spammy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Stats => "stats",
            CommandName::Haiku => "haiku",
            CommandName::Replay => "replay",
            CommandName::Conv => "conv",
            CommandName::Pretentious => "pretentious",
            CommandName::Leaderboard => "leaderboard",
            CommandName::Loserboard => "loserboard",
            CommandName::PercentLol => "percentlol",
            CommandName::Spammy => "spammy",
        }
    }

    /// Case-sensitive lookup. Returns `None` for anything outside the vocabulary.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: CommandName,
    /// Whitespace-trimmed, possibly empty
    pub args: String,
}

impl Command {
    pub fn new(name: CommandName, args: impl Into<String>) -> Self {
        Self {
            name,
            args: args.into(),
        }
    }

    /// Arguments split on whitespace
    pub fn tokens(&self) -> Vec<&str> {
        self.args.split_whitespace().collect()
    }
}

/// What to do with an incoming line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Command(Command),
    /// Record the original text for (sender, target)
    Corpus,
    /// Drop without storing or replying
    Ignored,
}
