//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StatError> for BotError {
    fn from(err: StatError) -> Self {
        match err {
            StatError::Storage(e) => BotError::Storage(e),
            other => BotError::Internal(other.to_string()),
        }
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lock poisoned: {0}")]
    Poisoned(String),
}

/// Statistic lookup errors
#[derive(Error, Debug)]
pub enum StatError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
