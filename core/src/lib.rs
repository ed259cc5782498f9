//! Multi-agent chat orchestration: intent classification, planning,
//! dispatch to the research / analysis / memory handlers and answer
//! synthesis.

pub mod analysis;
pub mod config;
pub mod config_types;
pub mod coordinator;
pub mod error;
pub mod llm;
pub mod memory;
pub mod message_bus;
pub mod planner;
pub mod research;
pub mod synthesis;
pub mod trace;
mod util;

pub use analysis::AnalysisReport;
pub use config::Config;
pub use coordinator::{Coordinator, FALLBACK_ANSWER};
pub use error::{AgentChatErr, Result};
pub use llm::{ChatModel, GroqChatClient};
pub use planner::{Intent, PlanStep, make_plan};
