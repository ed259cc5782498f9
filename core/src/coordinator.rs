use std::sync::Arc;

use agentchat_memory::Role;
use serde_json::{Map, Value as Json, json};
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisAgent, AnalysisReport};
use crate::config::Config;
use crate::error::Result;
use crate::llm::{ChatModel, select_chat_model};
use crate::memory::{MemoryAgent, Recall};
use crate::message_bus::{Message, MessageBus};
use crate::planner::{Intent, PlanStep, make_plan};
use crate::research::{DEFAULT_TOP_K, ResearchAgent, ResearchPayload};
use crate::synthesis::{bullets, synthesize};
use crate::trace::TraceLog;
use crate::util::{confidence_from_counts, format_score, infer_topics, truncate_chars};

pub const FALLBACK_ANSWER: &str =
    "Something went wrong. Try rephrasing the question or ask a simpler query.";
pub const NO_MEMORY_ANSWER: &str = "I couldn't find relevant memory for that query.";

const MANAGER: &str = "manager";
const RECALL_LINES: usize = 3;
const RECALL_CONTENT_CHARS: usize = 140;

const MEMORY_CUES: &[&str] = &["what did we", "earlier", "remember", "discuss"];
const RESEARCH_CUES: &[&str] = &[
    "research",
    "analyze",
    "trade-offs",
    "tradeoffs",
    "papers",
    "architectures",
    "efficiency",
    "methodologies",
    "challenges",
];
const PAPER_CUES: &[&str] = &["paper", "papers", "recent"];

/// Rule-based intent classification. Precedence, first match wins:
/// memory cues, then compare + recommend, then research cues (multi-step
/// when papers or recency are mentioned). Everything else is a simple query.
pub fn classify_text(text: &str) -> Intent {
    let t = text.to_lowercase();
    let has_any = |cues: &[&str]| cues.iter().any(|c| t.contains(c));
    if has_any(MEMORY_CUES) {
        Intent::MemoryQuery
    } else if t.contains("compare") && t.contains("recommend") {
        Intent::CompareRecommend
    } else if has_any(RESEARCH_CUES) {
        if has_any(PAPER_CUES) { Intent::MultiStep } else { Intent::ComplexResearch }
    } else {
        Intent::SimpleQuery
    }
}

/// Owns one chat session: the stores, the handlers and the trace.
pub struct Coordinator {
    bus: MessageBus,
    memory: MemoryAgent,
    research: ResearchAgent,
    analysis: AnalysisAgent,
    trace: TraceLog,
    llm: Option<Arc<dyn ChatModel>>,
    override_synthesis: bool,
}

impl Coordinator {
    pub fn new(config: &Config) -> Result<Self> {
        let trace = if config.trace_enabled {
            std::fs::create_dir_all(&config.log_dir)?;
            TraceLog::to_file(&config.trace_path())
        } else {
            TraceLog::disabled()
        };
        Ok(Self {
            bus: MessageBus::new(),
            memory: MemoryAgent::new(config.vector_dim)?,
            research: ResearchAgent::from_path(config.catalog_path.as_deref()),
            analysis: AnalysisAgent::default(),
            trace,
            llm: select_chat_model(config),
            override_synthesis: config.llm.override_synthesis,
        })
    }

    /// Replace the chat model, e.g. with a stub in tests.
    pub fn with_chat_model(mut self, llm: Option<Arc<dyn ChatModel>>) -> Self {
        self.llm = llm;
        self
    }

    pub fn memory(&self) -> &MemoryAgent {
        &self.memory
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    /// Classify `text`. A configured chat model is consulted first, but its
    /// answer is only traced; the rules in [`classify_text`] decide.
    pub async fn classify_intent(&self, text: &str) -> Intent {
        if let Some(llm) = &self.llm {
            if let Some(plan) = llm.complete(text).await {
                self.trace.record("llm.intent", json!({ "text": text, "llm_plan": plan }));
            }
        }
        classify_text(text)
    }

    pub async fn handle_user_query(&mut self, text: &str) -> String {
        self.handle(text).await
    }

    /// Answer one user query. Never fails: internal errors are traced and
    /// replaced by [`FALLBACK_ANSWER`]. Records written before the error are
    /// kept.
    pub async fn handle(&mut self, text: &str) -> String {
        self.memory.record_turn(Role::User, text, Map::new());
        let intent = self.classify_intent(text).await;
        self.trace.record("intent", json!({ "text": text, "intent": intent }));
        info!(%intent, "handling query");

        let overlap = self.memory.nearest_similarity(text);
        let plan = make_plan(intent, text);
        match self.run_plan(text, intent, &plan, overlap).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("query failed: {e}");
                self.trace.record("error", json!({ "error": e.to_string() }));
                self.memory.record_turn(Role::Manager, FALLBACK_ANSWER, Map::new());
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    async fn run_plan(
        &mut self,
        text: &str,
        intent: Intent,
        plan: &[PlanStep],
        overlap: f64,
    ) -> Result<String> {
        let steps: Vec<Json> = plan.iter().map(PlanStep::to_json).collect();
        self.trace.record("plan", json!({ "intent": intent, "steps": steps }));

        let mut research: Option<ResearchPayload> = None;
        let mut analysis: Option<AnalysisReport> = None;

        for step in plan {
            self.bus.send(Message {
                sender: MANAGER.to_string(),
                recipient: step.agent().to_string(),
                kind: step.action().to_string(),
                payload: step.payload(),
            });
            debug!(agent = step.agent(), action = step.action(), "dispatch");

            match step {
                PlanStep::Recall { query } => {
                    let recall = self.memory.recall(query);
                    self.trace.record("memory.recall", serde_json::to_value(&recall)?);
                    let answer = render_recall(&recall);
                    self.memory.record_turn(Role::Manager, &answer, Map::new());
                    return Ok(answer);
                }
                PlanStep::Search { query } => {
                    let payload = self.research.search(query, DEFAULT_TOP_K);
                    self.trace.record(
                        "research.result",
                        json!({
                            "query": query,
                            "num_results": payload.results.len(),
                            "confidence": payload.confidence,
                        }),
                    );
                    if intent == Intent::SimpleQuery {
                        return self.answer_simple_query(text, &payload, overlap);
                    }
                    research = Some(payload);
                }
                PlanStep::Analyze { instructions } => {
                    let payload = research.get_or_insert_with(|| {
                        let payload = self.research.search(text, DEFAULT_TOP_K);
                        self.trace.record(
                            "research.fallback_for_analysis",
                            json!({ "query": text, "num_results": payload.results.len() }),
                        );
                        payload
                    });
                    let report = self.analysis.analyze(payload, instructions);
                    self.trace.record("analysis.result", serde_json::to_value(&report)?);
                    analysis = Some(report);
                }
            }
        }

        if let Some(llm) = self.llm.as_ref().filter(|_| self.override_synthesis) {
            let prompt = format!("Synthesize answer for: {text}");
            if let Some(summary) = llm.complete(&prompt).await {
                self.trace.record("llm.synthesis", json!({ "summary": summary }));
                self.memory.record_turn(Role::Manager, &summary, Map::new());
                return Ok(summary);
            }
        }

        let answer = synthesize(intent, research.as_ref(), analysis.as_ref());
        let n_results = research.as_ref().map_or(0, |r| r.results.len());
        let confidence = confidence_from_counts(n_results, overlap);
        let provenance = Map::from_iter([("intent".to_string(), json!(intent))]);
        self.memory.store_knowledge(
            infer_topics(text),
            &answer,
            "manager_synthesis",
            MANAGER,
            confidence,
            provenance,
        )?;
        self.memory
            .store_agent_state(MANAGER, intent.as_ref(), &answer, confidence_metrics(confidence))?;
        self.memory.record_turn(Role::Manager, &answer, Map::new());
        Ok(answer)
    }

    fn answer_simple_query(
        &mut self,
        text: &str,
        payload: &ResearchPayload,
        overlap: f64,
    ) -> Result<String> {
        let top = &payload.results[..payload.results.len().min(DEFAULT_TOP_K)];
        let answer = format!("Main findings:\n{}", bullets(top));
        let confidence = confidence_from_counts(payload.results.len(), overlap);
        let provenance = Map::from_iter([("query".to_string(), json!(text))]);
        self.memory.store_knowledge(
            infer_topics(text),
            &answer,
            "research_agent",
            ResearchAgent::NAME,
            confidence,
            provenance,
        )?;
        self.memory
            .store_agent_state(ResearchAgent::NAME, text, &answer, confidence_metrics(confidence))?;
        self.memory.record_turn(Role::Manager, &answer, Map::new());
        Ok(answer)
    }
}

fn confidence_metrics(confidence: f64) -> Map<String, Json> {
    Map::from_iter([("confidence".to_string(), json!(confidence))])
}

fn render_recall(recall: &Recall) -> String {
    if recall.matches.is_empty() {
        return NO_MEMORY_ANSWER.to_string();
    }
    let lines: Vec<String> = recall
        .matches
        .iter()
        .take(RECALL_LINES)
        .map(|m| {
            format!(
                "- {}: {}... (conf={})",
                m.topic.join(", "),
                truncate_chars(&m.content, RECALL_CONTENT_CHARS),
                format_score(m.confidence)
            )
        })
        .collect();
    format!("Here's what I found in memory:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn classification_precedence() {
        let cases = [
            ("What did we discuss about neural networks earlier?", Intent::MemoryQuery),
            ("Remember the papers we compared and recommend one", Intent::MemoryQuery),
            ("Compare two approaches and recommend one", Intent::CompareRecommend),
            ("Compare transformer efficiency", Intent::ComplexResearch),
            ("Find recent papers on RL and analyze them", Intent::MultiStep),
            ("Research transformer architectures", Intent::ComplexResearch),
            ("What are the main types of neural networks?", Intent::SimpleQuery),
            ("hello there", Intent::SimpleQuery),
        ];
        for (text, want) in cases {
            assert_eq!(classify_text(text), want, "{text}");
        }
    }

    #[test]
    fn recall_rendering_caps_lines_and_content() {
        let m = |content: &str| crate::memory::RecallMatch {
            id: "kn_1".into(),
            topic: vec!["neural".into(), "networks".into()],
            content: content.into(),
            confidence: 1.0,
            similarity: None,
            source: "s".into(),
        };
        let long = "y".repeat(200);
        let recall = Recall {
            query: "q".into(),
            matches: vec![m("short"), m(&long), m("third"), m("fourth")],
        };
        let out = render_recall(&recall);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "- neural, networks: short... (conf=1.0)");
        assert_eq!(lines[2], format!("- neural, networks: {}... (conf=1.0)", "y".repeat(140)));

        let empty = Recall { query: "q".into(), matches: vec![] };
        assert_eq!(render_recall(&empty), NO_MEMORY_ANSWER);
    }

    #[tokio::test]
    async fn analyze_without_prior_search_researches_the_raw_text() {
        let tmp = TempDir::new().unwrap();
        let config = Config { log_dir: tmp.path().to_path_buf(), ..Config::default() };
        let mut co = Coordinator::new(&config).unwrap().with_chat_model(None);
        let text = "Compare two approaches and recommend one";
        let plan = [PlanStep::Analyze { instructions: "compare_and_recommend".into() }];

        let answer = co.run_plan(text, Intent::CompareRecommend, &plan, 0.0).await.unwrap();
        assert!(answer.starts_with("Comparison:\n"));

        let rows = co.trace().read_back().unwrap();
        let events: Vec<&str> = rows.iter().map(|r| r.event.as_str()).collect();
        assert_eq!(events, vec!["plan", "research.fallback_for_analysis", "analysis.result"]);
        assert_eq!(rows[1].payload["query"], text);
        assert_eq!(rows[1].payload["num_results"], 6);
        assert_eq!(co.memory().knowledge().len(), 1);
    }
}
