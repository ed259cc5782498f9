use std::io;

use agentchat_memory::{EmbeddingError, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentChatErr>;

#[derive(Error, Debug)]
pub enum AgentChatErr {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Malformed `config.toml`, environment value or `-c` override.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
