//! Per-session memory: conversation turns, knowledge records and agent
//! state, owned together so a coordinator carries its whole context.

pub mod summarizer;

use agentchat_memory::{
    AgentStateRecord, AgentStateStore, ConversationStore, ConversationTurn, KnowledgeRecord,
    KnowledgeStore, Role, gen_id, now_ts,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::error::Result;
use crate::util::{round3, truncate_chars};

/// Maximum number of characters kept in an agent-state result summary.
pub const RESULT_SUMMARY_MAX_CHARS: usize = 300;

const RECALL_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallMatch {
    pub id: String,
    pub topic: Vec<String>,
    pub content: String,
    pub confidence: f64,
    /// Set for vector hits; keyword-only hits carry `None`.
    pub similarity: Option<f64>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recall {
    pub query: String,
    pub matches: Vec<RecallMatch>,
}

impl RecallMatch {
    fn from_record(rec: &KnowledgeRecord, similarity: Option<f64>) -> Self {
        Self {
            id: rec.id.clone(),
            topic: rec.topic.clone(),
            content: rec.content.clone(),
            confidence: rec.confidence,
            similarity,
            source: rec.source.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MemoryAgent {
    conversation: ConversationStore,
    knowledge: KnowledgeStore,
    agent_state: AgentStateStore,
}

impl MemoryAgent {
    pub const NAME: &'static str = "memory";

    pub fn new(vector_dim: usize) -> Result<Self> {
        Ok(Self {
            conversation: ConversationStore::new(),
            knowledge: KnowledgeStore::new(vector_dim)?,
            agent_state: AgentStateStore::new(),
        })
    }

    pub fn record_turn(
        &mut self,
        role: Role,
        content: &str,
        metadata: Map<String, Json>,
    ) -> ConversationTurn {
        let turn = ConversationTurn {
            id: gen_id("turn"),
            timestamp: now_ts(),
            role,
            content: content.to_string(),
            metadata,
        };
        self.conversation.add(turn.clone());
        turn
    }

    pub fn store_knowledge(
        &mut self,
        topic: Vec<String>,
        content: &str,
        source: &str,
        agent: &str,
        confidence: f64,
        provenance: Map<String, Json>,
    ) -> Result<KnowledgeRecord> {
        let rec = KnowledgeRecord {
            id: gen_id("kn"),
            timestamp: now_ts(),
            topic,
            content: content.to_string(),
            source: source.to_string(),
            agent: agent.to_string(),
            confidence,
            provenance,
        };
        self.knowledge.add(rec.clone())?;
        Ok(rec)
    }

    /// Record a task outcome. `result_summary` is cut to
    /// [`RESULT_SUMMARY_MAX_CHARS`] characters.
    pub fn store_agent_state(
        &mut self,
        agent: &str,
        task: &str,
        result_summary: &str,
        metrics: Map<String, Json>,
    ) -> Result<AgentStateRecord> {
        let rec = AgentStateRecord {
            id: gen_id("st"),
            timestamp: now_ts(),
            agent: agent.to_string(),
            task: task.to_string(),
            result_summary: truncate_chars(result_summary, RESULT_SUMMARY_MAX_CHARS),
            metrics,
        };
        self.agent_state.add(rec.clone())?;
        Ok(rec)
    }

    /// Vector hits first (most similar first), then keyword hits that were
    /// not already returned.
    pub fn recall(&self, query: &str) -> Recall {
        let mut matches: Vec<RecallMatch> = self
            .knowledge
            .search_vector(query, RECALL_TOP_K)
            .into_iter()
            .map(|(rec, score)| RecallMatch::from_record(rec, Some(round3(f64::from(score)))))
            .collect();

        for rec in self.knowledge.search_keyword(query, RECALL_TOP_K) {
            if !matches.iter().any(|m| m.id == rec.id) {
                matches.push(RecallMatch::from_record(rec, None));
            }
        }

        Recall { query: query.to_string(), matches }
    }

    /// Similarity of the single closest knowledge record, or 0.0 when the
    /// store is empty.
    pub fn nearest_similarity(&self, query: &str) -> f64 {
        self.knowledge
            .search_vector(query, 1)
            .first()
            .map(|(_, score)| f64::from(*score))
            .unwrap_or(0.0)
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn agent_state(&self) -> &AgentStateStore {
        &self.agent_state
    }
}
