//! Domain entities - Core business objects with no external dependencies

pub mod message;
pub mod command;
pub mod leaderboard;

pub use message::IncomingMessage;
pub use command::{Classification, Command, CommandName};
pub use leaderboard::{BoardMode, LeaderboardEntry};
