use std::collections::HashMap;

use super::{KnowledgeRecord, StoreError};
use crate::embedding::EmbeddingError;
use crate::vector_store::HashedVectorStore;

/// Knowledge records keyed by id, with keyword and vector search.
///
/// Records are never updated or removed once added.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    records: Vec<KnowledgeRecord>,
    by_id: HashMap<String, usize>,
    vectors: HashedVectorStore,
}

impl KnowledgeStore {
    pub fn new(vector_dim: usize) -> Result<Self, EmbeddingError> {
        Ok(Self {
            records: Vec::new(),
            by_id: HashMap::new(),
            vectors: HashedVectorStore::new(vector_dim)?,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert `rec` and index `content + topic` for similarity search.
    pub fn add(&mut self, rec: KnowledgeRecord) -> Result<(), StoreError> {
        if self.by_id.contains_key(&rec.id) {
            return Err(StoreError::DuplicateId(rec.id));
        }
        self.vectors.add(&rec.id, &rec.index_text());
        self.by_id.insert(rec.id.clone(), self.records.len());
        self.records.push(rec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeRecord> {
        self.records.iter()
    }

    /// Case-insensitive substring match against content or any topic tag.
    /// Results keep insertion order; there is no relevance ranking.
    pub fn search_keyword(&self, query: &str, top_k: usize) -> Vec<&KnowledgeRecord> {
        let q = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.content.to_lowercase().contains(&q)
                    || r.topic.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .take(top_k)
            .collect()
    }

    /// Nearest records by hashed-embedding similarity.
    pub fn search_vector(&self, query: &str, top_k: usize) -> Vec<(&KnowledgeRecord, f32)> {
        self.vectors
            .search(query, top_k)
            .into_iter()
            .filter_map(|(id, score)| self.get(&id).map(|rec| (rec, score)))
            .collect()
    }
}
