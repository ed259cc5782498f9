use std::collections::HashSet;

use super::{AgentStateRecord, StoreError};

/// Per-agent task outcomes, in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct AgentStateStore {
    records: Vec<AgentStateRecord>,
    ids: HashSet<String>,
}

impl AgentStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rec: AgentStateRecord) -> Result<(), StoreError> {
        if !self.ids.insert(rec.id.clone()) {
            return Err(StoreError::DuplicateId(rec.id));
        }
        self.records.push(rec);
        Ok(())
    }

    pub fn list(&self) -> &[AgentStateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose task or result summary contains `keyword`, ignoring case.
    pub fn search(&self, keyword: &str) -> Vec<&AgentStateRecord> {
        let key = keyword.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.task.to_lowercase().contains(&key) || r.result_summary.to_lowercase().contains(&key)
            })
            .collect()
    }
}
