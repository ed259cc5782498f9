use std::collections::HashMap;

use crate::embedding::{EmbeddingError, HashedEmbedder};
use crate::knn::top_k_dot;

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    vec: Vec<f32>,
}

/// In-process vector store over hashed bag-of-words embeddings.
///
/// Entries keep the position of their first insertion; re-adding a key
/// replaces the embedding in place. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct HashedVectorStore {
    embedder: HashedEmbedder,
    entries: Vec<Entry>,
    by_key: HashMap<String, usize>,
}

impl HashedVectorStore {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        Ok(Self {
            embedder: HashedEmbedder::new(dim)?,
            entries: Vec::new(),
            by_key: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        self.embedder.embed(text)
    }

    /// Embed `text` and store it under `key`, replacing any prior entry.
    pub fn add(&mut self, key: &str, text: &str) {
        let vec = self.embedder.embed(text);
        match self.by_key.get(key) {
            Some(&idx) => self.entries[idx].vec = vec,
            None => {
                self.by_key.insert(key.to_string(), self.entries.len());
                self.entries.push(Entry { key: key.to_string(), vec });
            }
        }
    }

    /// Return up to `top_k` `(key, similarity)` pairs, most similar first.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<(String, f32)> {
        let qv = self.embedder.embed(query);
        let hay: Vec<&[f32]> = self.entries.iter().map(|e| e.vec.as_slice()).collect();
        top_k_dot(&hay, &qv, top_k)
            .into_iter()
            .map(|s| (self.entries[s.idx].key.clone(), s.score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> HashedVectorStore {
        let mut vs = HashedVectorStore::new(256).unwrap();
        vs.add("cnn", "convolutional neural networks for images");
        vs.add("rl", "reinforcement learning with model based planning");
        vs.add("opt", "adam optimizer adaptive learning rate");
        vs
    }

    #[test]
    fn search_ranks_most_similar_first() {
        let vs = store();
        let hits = vs.search("neural networks images", 3);
        assert_eq!(hits[0].0, "cnn");
    }

    #[test]
    fn search_respects_top_k_and_is_non_increasing() {
        let vs = store();
        for k in 0..5 {
            let hits = vs.search("learning", k);
            assert!(hits.len() <= k);
            assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
        }
    }

    #[test]
    fn tokenless_query_scores_zero_everywhere() {
        let vs = store();
        let hits = vs.search("!!!", 3);
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|(_, s)| *s == 0.0));
        let keys: Vec<_> = hits.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["cnn", "rl", "opt"]);
    }

    #[test]
    fn add_overwrites_existing_key_in_place() {
        let mut vs = store();
        vs.add("cnn", "gradient boosting trees");
        assert_eq!(vs.len(), 3);
        let hits = vs.search("gradient boosting", 1);
        assert_eq!(hits[0].0, "cnn");
    }
}
