//! Application services - Business logic orchestration

pub mod agent_service;
pub mod conversation;
pub mod leaderboard;

pub use agent_service::AgentService;
pub use conversation::ConversationChainer;
pub use leaderboard::LeaderboardRanker;
