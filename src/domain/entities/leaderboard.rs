use std::fmt;

/// Ordering of a ranked board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    /// Highest score first
    Leaderboard,
    /// Lowest score first
    Loserboard,
}

impl BoardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardMode::Leaderboard => "leaderboard",
            BoardMode::Loserboard => "loserboard",
        }
    }

    pub fn ascending(&self) -> bool {
        matches!(self, BoardMode::Loserboard)
    }
}

impl fmt::Display for BoardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub nick: String,
    /// Already rounded to 2 decimal places
    pub score: f64,
}

impl LeaderboardEntry {
    pub fn new(nick: impl Into<String>, score: f64) -> Self {
        Self {
            nick: nick.into(),
            score,
        }
    }
}
