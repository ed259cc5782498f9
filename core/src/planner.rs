use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json, json};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::analysis::AnalysisAgent;
use crate::memory::MemoryAgent;
use crate::research::ResearchAgent;

/// Coarse classification of a user query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    MemoryQuery,
    SimpleQuery,
    ComplexResearch,
    MultiStep,
    CompareRecommend,
}

/// One dispatch in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    Recall { query: String },
    Search { query: String },
    Analyze { instructions: String },
}

impl PlanStep {
    pub fn agent(&self) -> &'static str {
        match self {
            PlanStep::Recall { .. } => MemoryAgent::NAME,
            PlanStep::Search { .. } => ResearchAgent::NAME,
            PlanStep::Analyze { .. } => AnalysisAgent::NAME,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            PlanStep::Recall { .. } => "recall",
            PlanStep::Search { .. } => "search",
            PlanStep::Analyze { .. } => "analyze",
        }
    }

    pub fn payload(&self) -> Map<String, Json> {
        let mut map = Map::new();
        match self {
            PlanStep::Recall { query } | PlanStep::Search { query } => {
                map.insert("query".to_string(), json!(query));
            }
            PlanStep::Analyze { instructions } => {
                map.insert("instructions".to_string(), json!(instructions));
            }
        }
        map
    }

    /// `{agent, action, payload}` as written to the trace.
    pub fn to_json(&self) -> Json {
        json!({ "agent": self.agent(), "action": self.action(), "payload": self.payload() })
    }
}

fn analyze(instructions: &str) -> PlanStep {
    PlanStep::Analyze { instructions: instructions.to_string() }
}

/// Map an intent to its fixed sequence of steps.
pub fn make_plan(intent: Intent, query: &str) -> Vec<PlanStep> {
    let search = PlanStep::Search { query: query.to_string() };
    match intent {
        Intent::MemoryQuery => vec![PlanStep::Recall { query: query.to_string() }],
        Intent::SimpleQuery => vec![search],
        Intent::ComplexResearch => vec![search, analyze("efficiency_and_tradeoffs")],
        Intent::MultiStep => vec![search, analyze("methodologies_and_challenges")],
        Intent::CompareRecommend => vec![search, analyze("compare_and_recommend")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn every_plan_starts_with_recall_or_search() {
        for intent in Intent::iter() {
            let plan = make_plan(intent, "q");
            assert!(!plan.is_empty());
            assert!(matches!(plan[0], PlanStep::Recall { .. } | PlanStep::Search { .. }));
            if intent == Intent::MemoryQuery {
                assert_eq!(plan.len(), 1);
            }
        }
    }

    #[test]
    fn complex_research_plan_shape() {
        let plan = make_plan(Intent::ComplexResearch, "transformers");
        let shape: Vec<(&str, &str)> = plan.iter().map(|s| (s.agent(), s.action())).collect();
        assert_eq!(shape, vec![("research", "search"), ("analysis", "analyze")]);
        assert_eq!(plan[1].payload()["instructions"], "efficiency_and_tradeoffs");
        assert_eq!(plan[0].payload()["query"], "transformers");
    }

    #[test]
    fn analysis_instructions_per_intent() {
        let instr = |intent| match make_plan(intent, "q").pop() {
            Some(PlanStep::Analyze { instructions }) => Some(instructions),
            _ => None,
        };
        assert_eq!(instr(Intent::MultiStep).as_deref(), Some("methodologies_and_challenges"));
        assert_eq!(instr(Intent::CompareRecommend).as_deref(), Some("compare_and_recommend"));
        assert_eq!(instr(Intent::SimpleQuery), None);
    }

    #[test]
    fn intent_labels_are_snake_case() {
        assert_eq!(Intent::CompareRecommend.to_string(), "compare_recommend");
        assert_eq!("multi_step".parse::<Intent>().unwrap(), Intent::MultiStep);
        assert!("unknown".parse::<Intent>().is_err());
        assert_eq!(serde_json::to_value(Intent::MemoryQuery).unwrap(), "memory_query");
    }

    #[test]
    fn step_json_matches_trace_shape() {
        let step = PlanStep::Recall { query: "nets".into() };
        assert_eq!(
            step.to_json(),
            json!({"agent": "memory", "action": "recall", "payload": {"query": "nets"}})
        );
    }
}
