use serde::{Deserialize, Serialize};

use crate::memory::summarizer::{Summarizer, TruncatingSummarizer};
use crate::research::{CatalogDoc, ResearchPayload};

/// Score used for optimizer names missing from the table.
const DEFAULT_OPTIMIZER_SCORE: f64 = 0.65;

const OPTIMIZER_SCORES: &[(&str, f64)] = &[
    ("sgd", 0.6),
    ("momentum", 0.65),
    ("rmsprop", 0.68),
    ("adam", 0.8),
    ("adamw", 0.82),
];

const LINEAR_ATTENTION_TAGS: &[&str] = &["performer", "reformer", "linear-attention", "linear"];
const SPARSE_ATTENTION_TAGS: &[&str] = &["longformer", "sparse", "bigbird"];

const METHODOLOGIES: &[&str] = &["Baseline comparison", "Ablation studies", "Evaluation on benchmarks"];
const CHALLENGES: &[&str] = &["sample efficiency", "distributional shift", "scalability"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerScore {
    pub name: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyRow {
    pub architecture: String,
    pub attention: String,
    pub efficiency_score: f64,
}

/// Result of an analysis step. The variant is chosen from the query and
/// instructions, never from the documents themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisReport {
    OptimizerComparison {
        ranking: Vec<OptimizerScore>,
        notes: String,
    },
    TransformerEfficiency {
        summary: String,
        table: Vec<EfficiencyRow>,
    },
    GenericSummary {
        summary: String,
        methodologies: Vec<String>,
        challenges: Vec<String>,
    },
}

impl AnalysisReport {
    /// Free-text summary, when the variant carries one.
    pub fn summary(&self) -> Option<&str> {
        match self {
            AnalysisReport::OptimizerComparison { .. } => None,
            AnalysisReport::TransformerEfficiency { summary, .. }
            | AnalysisReport::GenericSummary { summary, .. } => Some(summary),
        }
    }
}

/// Rank optimizer names with the fixed heuristic table. The lookup key is the
/// first word of the lowercased name with `-` removed.
pub fn score_optimizers<S: AsRef<str>>(names: &[S]) -> Vec<OptimizerScore> {
    let mut out: Vec<OptimizerScore> = names
        .iter()
        .map(|n| {
            let name = n.as_ref();
            let normalized = name.to_lowercase().replace('-', "");
            let key = normalized.split_whitespace().next().unwrap_or("");
            let score = OPTIMIZER_SCORES
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, s)| *s)
                .unwrap_or(DEFAULT_OPTIMIZER_SCORE);
            let reason = if score >= 0.75 { "widely used" } else { "effective in many settings" };
            OptimizerScore { name: name.to_string(), score, reason: reason.to_string() }
        })
        .collect();
    out.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Bucket each document by the attention family named in its tags.
pub fn estimate_transformer_efficiency(items: &[CatalogDoc]) -> Vec<EfficiencyRow> {
    let mut table: Vec<EfficiencyRow> = items
        .iter()
        .map(|it| {
            let tags: Vec<String> = it.tags.iter().map(|t| t.to_lowercase()).collect();
            let has_any = |keys: &[&str]| tags.iter().any(|t| keys.contains(&t.as_str()));
            let (attention, efficiency_score) = if has_any(LINEAR_ATTENTION_TAGS) {
                ("O(n) or O(n log n)", 0.85)
            } else if has_any(SPARSE_ATTENTION_TAGS) {
                ("Sparse (≈O(n log n))", 0.8)
            } else {
                ("Full (O(n^2))", 0.6)
            };
            let architecture = if it.title.is_empty() { "unknown".to_string() } else { it.title.clone() };
            EfficiencyRow { architecture, attention: attention.to_string(), efficiency_score }
        })
        .collect();
    table.sort_by(|a, b| {
        b.efficiency_score
            .partial_cmp(&a.efficiency_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    table
}

/// Heuristic analysis over research results.
pub struct AnalysisAgent {
    summarizer: Box<dyn Summarizer>,
}

impl AnalysisAgent {
    pub const NAME: &'static str = "analysis";

    pub fn new(summarizer: Box<dyn Summarizer>) -> Self {
        Self { summarizer }
    }

    /// Pick a heuristic by sniffing `research.query` and `instructions`:
    /// optimizer queries first, then transformer efficiency, then a generic
    /// summary.
    pub fn analyze(&self, research: &ResearchPayload, instructions: &str) -> AnalysisReport {
        let query = research.query.to_lowercase();
        let results = &research.results;

        if query.contains("optimizer") || query.contains("optimization") {
            let names: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
            return AnalysisReport::OptimizerComparison {
                ranking: score_optimizers(&names),
                notes: "Heuristic scoring; task specific tuning required.".to_string(),
            };
        }

        let wants_tradeoffs = ["efficiency", "tradeoffs", "trade-offs"]
            .iter()
            .any(|k| instructions.contains(k));
        if query.contains("transformer") && wants_tradeoffs {
            return AnalysisReport::TransformerEfficiency {
                summary: "Estimated efficiency from attention pattern heuristics.".to_string(),
                table: estimate_transformer_efficiency(results),
            };
        }

        let texts: Vec<String> = results.iter().map(|r| r.summary.clone()).collect();
        AnalysisReport::GenericSummary {
            summary: self.summarizer.summarize(&texts).unwrap_or_default(),
            methodologies: METHODOLOGIES.iter().map(|s| s.to_string()).collect(),
            challenges: CHALLENGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for AnalysisAgent {
    fn default() -> Self {
        Self::new(Box::new(TruncatingSummarizer::default()))
    }
}
