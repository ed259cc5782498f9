//! Memory primitives for the chat orchestrator: a deterministic hashed
//! embedding, a linear-scan vector store, and the append-only record stores
//! (knowledge, conversation, agent state) built on top of it.

pub mod embedding;
pub mod jsonl;
pub mod knn;
pub mod store;
pub mod vector_store;

pub use embedding::{EmbeddingError, HashedEmbedder};
pub use jsonl::JsonlAppender;
pub use store::{
    AgentStateRecord, AgentStateStore, ConversationStore, ConversationTurn, KnowledgeRecord,
    KnowledgeStore, Role, StoreError, gen_id, now_ts,
};
pub use vector_store::HashedVectorStore;
