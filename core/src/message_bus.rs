use serde::Serialize;
use serde_json::{Map, Value as Json};

/// A dispatch from one agent to another. Agents are invoked synchronously;
/// the bus only keeps a record of what was sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Map<String, Json>,
}

#[derive(Debug, Default)]
pub struct MessageBus {
    sent: Vec<Message>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, msg: Message) {
        tracing::debug!(sender = %msg.sender, recipient = %msg.recipient, kind = %msg.kind, "bus send");
        self.sent.push(msg);
    }

    pub fn dump(&self) -> Vec<Message> {
        self.sent.clone()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}
