//! Types used to define the fields of [`crate::config::Config`].

// Note this file should generally be restricted to simple struct/enum
// definitions that do not contain business logic.

use std::path::PathBuf;

use serde::Deserialize;

/// Shape of `config.toml` after environment and `-c` overrides are merged in.
/// Every field is optional; defaults are applied by [`crate::config::Config`].
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub struct ConfigToml {
    /// Directory that receives `trace.jsonl`.
    pub log_dir: Option<PathBuf>,

    /// JSON array of `{title, summary, tags}` documents used by research.
    pub catalog_path: Option<PathBuf>,

    /// Dimension of the hashed embeddings. Must be non-zero.
    pub vector_dim: Option<i64>,

    /// When false, no trace file is written.
    pub trace: Option<bool>,

    #[serde(default)]
    pub llm: LlmToml,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub struct LlmToml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,

    /// Whether a non-empty model completion replaces locally synthesized
    /// answers.
    pub override_synthesis: Option<bool>,
}

/// Resolved settings for the optional chat-completion side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// The side channel is only enabled when a key is present.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub override_synthesis: bool,
}

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "mixtral-8x7b-32768";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 20;

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            override_synthesis: true,
        }
    }
}
