use super::ConversationTurn;

/// Append-only conversation log.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<ConversationTurn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns whose content contains `keyword`, ignoring case.
    pub fn search(&self, keyword: &str) -> Vec<&ConversationTurn> {
        let key = keyword.to_lowercase();
        self.turns.iter().filter(|t| t.content.to_lowercase().contains(&key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Role, gen_id, now_ts};
    use serde_json::Map;

    fn turn(role: Role, content: &str) -> ConversationTurn {
        ConversationTurn { id: gen_id("turn"), timestamp: now_ts(), role, content: content.into(), metadata: Map::new() }
    }

    #[test]
    fn history_keeps_order_and_search_ignores_case() {
        let mut c = ConversationStore::new();
        c.add(turn(Role::User, "Tell me about Transformers"));
        c.add(turn(Role::Manager, "Main findings: attention"));
        c.add(turn(Role::User, "and transformer efficiency?"));

        assert_eq!(c.len(), 3);
        assert_eq!(c.history()[1].role, Role::Manager);
        let hits = c.search("TRANSFORMER");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|t| t.role == Role::User));
        assert!(c.search("missing").is_empty());
    }
}
