use std::path::Path;

use agentchat_memory::{JsonlAppender, now_ts};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// One line of `trace.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub timestamp: String,
    pub event: String,
    pub payload: Json,
}

/// Best-effort event trace. Write failures are logged and otherwise ignored
/// so tracing can never fail a request.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    sink: Option<JsonlAppender>,
}

impl TraceLog {
    pub fn to_file(path: &Path) -> Self {
        Self { sink: Some(JsonlAppender::new(path)) }
    }

    /// A trace that records nothing.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn record(&self, event: &str, payload: Json) {
        let Some(sink) = &self.sink else { return };
        let rec = TraceRecord { timestamp: now_ts(), event: event.to_string(), payload };
        if let Err(e) = sink.append(&rec) {
            tracing::warn!("failed to append trace event {event}: {e}");
        }
    }

    /// Records written so far; empty when disabled.
    pub fn read_back(&self) -> std::io::Result<Vec<TraceRecord>> {
        match &self.sink {
            Some(sink) => sink.read_all(),
            None => Ok(Vec::new()),
        }
    }
}
