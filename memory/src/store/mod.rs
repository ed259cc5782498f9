//! Record types and the append-only in-memory stores that own them.

mod agent_state;
mod conversation;
mod knowledge;

pub use agent_state::AgentStateStore;
pub use conversation::ConversationStore;
pub use knowledge::KnowledgeStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use strum_macros::{Display, EnumString, IntoStaticStr};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record id already present: {0}")]
    DuplicateId(String),
}

/// Generate a record id of the form `<prefix>_<10 hex chars>`.
pub fn gen_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..10])
}

/// Current UTC time as RFC 3339 with second precision and a `Z` suffix.
pub fn now_ts() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Manager,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub timestamp: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Json>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub id: String,
    pub timestamp: String,
    pub topic: Vec<String>,
    pub content: String,
    pub source: String,
    pub agent: String,
    /// Heuristic value in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub provenance: Map<String, Json>,
}

impl KnowledgeRecord {
    /// Text indexed by the vector store for this record.
    pub fn index_text(&self) -> String {
        format!("{} {}", self.content, self.topic.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStateRecord {
    pub id: String,
    pub timestamp: String,
    pub agent: String,
    pub task: String,
    pub result_summary: String,
    #[serde(default)]
    pub metrics: Map<String, Json>,
}
