//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Database / Storage: Corpus persistence (SQLite, in-memory)
//! - Stats / Directory: Per-user metrics and active users
//! - Adapters: Platform integrations (IRC, console)

pub mod config;
pub mod database;
pub mod storage;
pub mod stats;
pub mod directory;
pub mod adapters;
