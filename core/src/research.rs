use std::fs;
use std::path::Path;

use agentchat_memory::now_ts;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K: usize = 6;

/// One entry of the static research catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDoc {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogDoc {
    fn new(title: &str, summary: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            summary: summary.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Lowercased text that query tokens are matched against.
    fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.summary, self.tags.join(" ")).to_lowercase()
    }
}

/// Output of a research search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPayload {
    pub query: String,
    pub results: Vec<CatalogDoc>,
    pub timestamp: String,
    /// Proxy for result volume, not relevance.
    pub confidence: f64,
    pub agent: String,
}

/// Documents used when no catalog file is available.
pub fn builtin_catalog() -> Vec<CatalogDoc> {
    vec![
        CatalogDoc::new(
            "Feedforward Neural Networks (MLP)",
            "Simple layered perceptrons; good for tabular tasks.",
            &["neural networks", "mlp"],
        ),
        CatalogDoc::new(
            "Convolutional Neural Networks (CNN)",
            "Weight sharing and local fields; strong for images.",
            &["neural networks", "cnn"],
        ),
        CatalogDoc::new(
            "Recurrent Neural Networks (RNN, LSTM)",
            "Sequence models; LSTM/GRU mitigate vanishing gradients.",
            &["neural networks", "rnn", "lstm"],
        ),
        CatalogDoc::new(
            "Transformers",
            "Self-attention based; scalable with parallel compute.",
            &["transformer", "attention"],
        ),
        CatalogDoc::new(
            "Adam / AdamW",
            "Adaptive optimizers; good default for many models.",
            &["optimizer", "adam", "adamw"],
        ),
        CatalogDoc::new(
            "Gradient Descent Variants",
            "SGD, momentum, Nesterov; simple and effective.",
            &["optimizer", "sgd", "momentum"],
        ),
        CatalogDoc::new(
            "RL Paper: Model-Based RL (2024)",
            "Focus on sample efficiency and planning.",
            &["reinforcement learning", "model-based", "2024"],
        ),
    ]
}

/// Load the catalog at `path`. Any failure (missing, unreadable, malformed,
/// empty) falls back to [`builtin_catalog`].
pub fn load_catalog(path: Option<&Path>) -> Vec<CatalogDoc> {
    let Some(path) = path else { return builtin_catalog() };
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!("catalog {} unavailable ({e}); using built-ins", path.display());
            return builtin_catalog();
        }
    };
    match serde_json::from_str::<Vec<CatalogDoc>>(&text) {
        Ok(docs) if !docs.is_empty() => docs,
        Ok(_) => {
            tracing::warn!("catalog {} is empty; using built-ins", path.display());
            builtin_catalog()
        }
        Err(e) => {
            tracing::warn!("catalog {} is malformed ({e}); using built-ins", path.display());
            builtin_catalog()
        }
    }
}

/// Keyword search over the static catalog.
#[derive(Debug, Clone)]
pub struct ResearchAgent {
    catalog: Vec<CatalogDoc>,
}

impl ResearchAgent {
    pub const NAME: &'static str = "research";

    pub fn new(catalog: Vec<CatalogDoc>) -> Self {
        if catalog.is_empty() {
            return Self { catalog: builtin_catalog() };
        }
        Self { catalog }
    }

    pub fn from_path(path: Option<&Path>) -> Self {
        Self::new(load_catalog(path))
    }

    pub fn catalog(&self) -> &[CatalogDoc] {
        &self.catalog
    }

    /// Return documents containing any query token longer than three
    /// characters. With no match, the first `top_k` documents are returned
    /// instead, so the result is never empty.
    pub fn search(&self, query: &str, top_k: usize) -> ResearchPayload {
        let q = query.to_lowercase();
        let tokens: Vec<&str> = q.split_whitespace().filter(|t| t.chars().count() > 3).collect();

        let mut results: Vec<CatalogDoc> = self
            .catalog
            .iter()
            .filter(|doc| {
                let text = doc.haystack();
                tokens.iter().any(|tok| text.contains(tok))
            })
            .cloned()
            .collect();
        if results.is_empty() {
            results = self.catalog.iter().take(top_k).cloned().collect();
        }
        let confidence = crate::util::round3((0.5 + 0.05 * results.len() as f64).min(1.0));
        results.truncate(top_k);

        ResearchPayload {
            query: query.to_string(),
            results,
            timestamp: now_ts(),
            confidence,
            agent: Self::NAME.to_string(),
        }
    }
}

impl Default for ResearchAgent {
    fn default() -> Self {
        Self::new(builtin_catalog())
    }
}
