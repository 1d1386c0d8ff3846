//! Error types for chat-distill.

use std::path::PathBuf;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem read/write failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A history log or config file that is not the JSON we expect.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config key not recognized by [`crate::BotConfig::set`].
    #[error("unknown config key: {0}")]
    UnknownConfigKey(String),

    /// Config value out of range or unparsable for its key.
    #[error("invalid value `{value}` for config key {key}")]
    InvalidConfigValue { key: String, value: String },

    /// Distillation root contained no history logs.
    #[error("no history logs found under {0:?}")]
    NoHistoryLogs(PathBuf),
}

/// Result type for chat-distill operations.
pub type Result<T> = std::result::Result<T, Error>;
