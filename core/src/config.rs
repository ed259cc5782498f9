use std::path::{Path, PathBuf};

use toml::Value as TomlValue;

use crate::config_types::{ConfigToml, LlmConfig};
use crate::error::{AgentChatErr, Result};

/// Filename of the optional configuration file inside the home directory.
pub const CONFIG_TOML_FILE: &str = "config.toml";

const DEFAULT_HOME_DIR: &str = ".agentchat";
const DEFAULT_LOG_DIR: &str = "outputs";
pub const DEFAULT_VECTOR_DIM: usize = 256;

/// Environment variables consulted by [`Config::load`], mapped to the dotted
/// config key they override.
const ENV_KEYS: &[(&str, &str)] = &[
    ("LOG_DIR", "log_dir"),
    ("KB_PATH", "catalog_path"),
    ("VECTOR_DIM", "vector_dim"),
    ("GROQ_API_KEY", "llm.api_key"),
    ("GROQ_BASE_URL", "llm.base_url"),
];

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `config.toml`.
    pub home: PathBuf,
    pub log_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub vector_dim: usize,
    pub trace_enabled: bool,
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home: PathBuf::from(DEFAULT_HOME_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            catalog_path: None,
            vector_dim: DEFAULT_VECTOR_DIM,
            trace_enabled: true,
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Load from `$AGENTCHAT_HOME/config.toml` (default `./.agentchat`), then
    /// the process environment, then `overrides` (highest precedence).
    pub fn load(overrides: Vec<(String, TomlValue)>) -> Result<Self> {
        Self::load_with(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an injectable environment lookup.
    pub fn load_with<F>(overrides: Vec<(String, TomlValue)>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = env("AGENTCHAT_HOME")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIR));

        let mut root = load_config_as_toml(&home)?;

        for (var, key) in ENV_KEYS {
            let Some(raw) = env(var).filter(|s| !s.trim().is_empty()) else { continue };
            let value = if *key == "vector_dim" {
                let dim = raw.trim().parse::<i64>().map_err(|_| {
                    AgentChatErr::Config(format!("{var} must be an integer, got {raw:?}"))
                })?;
                TomlValue::Integer(dim)
            } else {
                TomlValue::String(raw)
            };
            apply_toml_override(&mut root, key, value);
        }

        for (path, value) in overrides {
            apply_toml_override(&mut root, &path, value);
        }

        let cfg: ConfigToml = root.try_into()?;
        Self::from_toml(cfg, home)
    }

    fn from_toml(cfg: ConfigToml, home: PathBuf) -> Result<Self> {
        let defaults = Config::default();
        let vector_dim = match cfg.vector_dim {
            None => defaults.vector_dim,
            Some(d) if d > 0 => d as usize,
            Some(d) => {
                return Err(AgentChatErr::Config(format!("vector_dim must be positive, got {d}")));
            }
        };

        let llm_defaults = defaults.llm;
        let llm = LlmConfig {
            api_key: cfg.llm.api_key.filter(|k| !k.trim().is_empty()),
            base_url: cfg.llm.base_url.unwrap_or(llm_defaults.base_url),
            model: cfg.llm.model.unwrap_or(llm_defaults.model),
            timeout_secs: cfg.llm.timeout_secs.unwrap_or(llm_defaults.timeout_secs),
            override_synthesis: cfg
                .llm
                .override_synthesis
                .unwrap_or(llm_defaults.override_synthesis),
        };

        Ok(Self {
            home,
            log_dir: cfg.log_dir.unwrap_or(defaults.log_dir),
            catalog_path: cfg.catalog_path,
            vector_dim,
            trace_enabled: cfg.trace.unwrap_or(defaults.trace_enabled),
            llm,
        })
    }

    /// True when a chat-completion API key is configured.
    pub fn use_llm(&self) -> bool {
        self.llm.api_key.is_some()
    }

    pub fn trace_path(&self) -> PathBuf {
        self.log_dir.join("trace.jsonl")
    }
}

/// Read `config.toml` under `home`. A missing file is an empty table.
fn load_config_as_toml(home: &Path) -> Result<TomlValue> {
    let path = home.join(CONFIG_TOML_FILE);
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let table: toml::Table = toml::from_str(&contents)?;
            Ok(TomlValue::Table(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, using defaults", path.display());
            Ok(TomlValue::Table(Default::default()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse a `key=value` override. The value is parsed as TOML and falls back
/// to a plain string, so `-c llm.model=llama3` works without quotes.
pub fn parse_override(raw: &str) -> Result<(String, TomlValue)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(AgentChatErr::Config(format!("invalid override (missing '='): {raw}")));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(AgentChatErr::Config(format!("empty key in override: {raw}")));
    }
    let value = value.trim();
    let parsed = toml::from_str::<toml::Table>(&format!("_v_ = {value}"))
        .ok()
        .and_then(|mut t| t.remove("_v_"))
        .unwrap_or_else(|| TomlValue::String(value.to_string()));
    Ok((key.to_string(), parsed))
}

/// Set `value` at the dotted `path` inside `root`, creating tables as needed.
fn apply_toml_override(root: &mut TomlValue, path: &str, value: TomlValue) {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_table() {
            *current = TomlValue::Table(Default::default());
        }
        let TomlValue::Table(table) = current else { return };
        if segments.peek().is_none() {
            table.insert(segment.to_string(), value);
            return;
        }
        current = table
            .entry(segment.to_string())
            .or_insert_with(|| TomlValue::Table(Default::default()));
    }
}
