//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (IncomingMessage, Command, LeaderboardEntry)
//! - Traits: Abstractions for infrastructure (Bot, CorpusStore)

pub mod entities;
pub mod traits;
