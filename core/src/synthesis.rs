//! Final answer rendering from whatever the plan produced.

use crate::analysis::AnalysisReport;
use crate::planner::Intent;
use crate::research::{CatalogDoc, ResearchPayload};
use crate::util::{format_score, to_json};

pub const NO_FINDINGS: &str = "No findings.";

/// Compose the manager's answer. Intent-specific layouts need both a research
/// payload and an analysis report (compare/recommend only needs the report);
/// anything else degrades to a plain findings list.
pub fn synthesize(
    intent: Intent,
    research: Option<&ResearchPayload>,
    analysis: Option<&AnalysisReport>,
) -> String {
    match (intent, research, analysis) {
        (Intent::ComplexResearch, Some(_), Some(report)) => complex_research(report),
        (Intent::MultiStep, Some(research), Some(report)) => multi_step(research, report),
        (Intent::CompareRecommend, _, Some(report)) => match report {
            AnalysisReport::GenericSummary { summary, .. } => format!("Comparison:\n{summary}"),
            other => format!("Comparison result:\n{}", to_json(other)),
        },
        (_, Some(research), _) => format!("Findings:\n{}", bullets(&research.results)),
        _ => NO_FINDINGS.to_string(),
    }
}

/// `- {title}: {summary}` per document, newline separated.
pub fn bullets(docs: &[CatalogDoc]) -> String {
    docs.iter()
        .map(|d| format!("- {}: {}", d.title, d.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

fn complex_research(report: &AnalysisReport) -> String {
    match report {
        AnalysisReport::TransformerEfficiency { summary, table } => {
            let mut lines = vec!["Transformer Efficiency (heuristic):".to_string()];
            lines.extend(table.iter().map(|row| {
                format!(
                    "- {}: {} | efficiency≈{}",
                    row.architecture,
                    row.attention,
                    format_score(row.efficiency_score)
                )
            }));
            format!("{}\nSummary: {summary}", lines.join("\n"))
        }
        AnalysisReport::OptimizerComparison { ranking, notes } => {
            let mut lines = vec!["Optimizer ranking (heuristic):".to_string()];
            lines.extend(
                ranking
                    .iter()
                    .map(|r| format!("- {}: score={} ({})", r.name, format_score(r.score), r.reason)),
            );
            lines.push(notes.clone());
            lines.join("\n")
        }
        AnalysisReport::GenericSummary { summary, .. } => format!("Analysis summary:\n{summary}"),
    }
}

fn multi_step(research: &ResearchPayload, report: &AnalysisReport) -> String {
    let titles: Vec<&str> = research.results.iter().map(|d| d.title.as_str()).collect();
    let challenges = match report {
        AnalysisReport::GenericSummary { challenges, .. } => challenges.join(", "),
        _ => String::new(),
    };
    [
        format!("Research: {}", list_literal(&titles)),
        format!("Analysis: {}", report.summary().unwrap_or_default()),
        format!("Common challenges: {challenges}"),
    ]
    .join("\n")
}

/// Render titles as a bracketed list of quoted strings, e.g. `['a', 'b']`.
/// Single quotes are used unless the text itself contains one.
fn list_literal(items: &[&str]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|s| {
            if s.contains('\'') && !s.contains('"') {
                format!("\"{}\"", s.replace('\\', "\\\\"))
            } else {
                format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{EfficiencyRow, OptimizerScore};
    use pretty_assertions::assert_eq;

    fn research(titles: &[&str]) -> ResearchPayload {
        ResearchPayload {
            query: "q".into(),
            results: titles
                .iter()
                .map(|t| CatalogDoc { title: t.to_string(), summary: format!("About {t}."), tags: vec![] })
                .collect(),
            timestamp: "2026-01-01T00:00:00Z".into(),
            confidence: 0.55,
            agent: "research".into(),
        }
    }

    fn generic(summary: &str) -> AnalysisReport {
        AnalysisReport::GenericSummary {
            summary: summary.into(),
            methodologies: vec!["Baseline comparison".into()],
            challenges: vec!["sample efficiency".into(), "scalability".into()],
        }
    }

    #[test]
    fn transformer_efficiency_layout() {
        let report = AnalysisReport::TransformerEfficiency {
            summary: "Estimated.".into(),
            table: vec![EfficiencyRow {
                architecture: "Transformers".into(),
                attention: "Full (O(n^2))".into(),
                efficiency_score: 0.6,
            }],
        };
        let out = synthesize(Intent::ComplexResearch, Some(&research(&["Transformers"])), Some(&report));
        assert_eq!(
            out,
            "Transformer Efficiency (heuristic):\n- Transformers: Full (O(n^2)) | efficiency≈0.6\nSummary: Estimated."
        );
    }

    #[test]
    fn optimizer_layout_ends_with_notes() {
        let report = AnalysisReport::OptimizerComparison {
            ranking: vec![OptimizerScore { name: "Adam".into(), score: 0.8, reason: "widely used".into() }],
            notes: "Heuristic scoring; task specific tuning required.".into(),
        };
        let out = synthesize(Intent::ComplexResearch, Some(&research(&["Adam"])), Some(&report));
        assert_eq!(
            out,
            "Optimizer ranking (heuristic):\n- Adam: score=0.8 (widely used)\nHeuristic scoring; task specific tuning required."
        );
    }

    #[test]
    fn multi_step_lists_titles_and_challenges() {
        let out = synthesize(
            Intent::MultiStep,
            Some(&research(&["RL Paper: Model-Based RL (2024)"])),
            Some(&generic("Focus on sample efficiency.")),
        );
        assert_eq!(
            out,
            "Research: ['RL Paper: Model-Based RL (2024)']\nAnalysis: Focus on sample efficiency.\nCommon challenges: sample efficiency, scalability"
        );
    }

    #[test]
    fn compare_recommend_generic_and_structured() {
        let out = synthesize(Intent::CompareRecommend, None, Some(&generic("Both work.")));
        assert_eq!(out, "Comparison:\nBoth work.");

        let report = AnalysisReport::OptimizerComparison { ranking: vec![], notes: "n".into() };
        let out = synthesize(Intent::CompareRecommend, Some(&research(&["x"])), Some(&report));
        assert!(out.starts_with("Comparison result:\n{"));
        assert!(out.contains("\"type\": \"optimizer_comparison\""));
    }

    #[test]
    fn falls_back_to_findings_then_nothing() {
        let out = synthesize(Intent::ComplexResearch, Some(&research(&["A", "B"])), None);
        assert_eq!(out, "Findings:\n- A: About A.\n- B: About B.");
        assert_eq!(synthesize(Intent::MultiStep, None, None), NO_FINDINGS);
    }

    #[test]
    fn list_literal_quotes_like_a_list_repr() {
        assert_eq!(list_literal(&[]), "[]");
        assert_eq!(list_literal(&["a", "b"]), "['a', 'b']");
        assert_eq!(list_literal(&["it's"]), "[\"it's\"]");
        assert_eq!(list_literal(&["it's a\\b"]), "[\"it's a\\\\b\"]");
        assert_eq!(list_literal(&["a\\b"]), "['a\\\\b']");
    }
}
