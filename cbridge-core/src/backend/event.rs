use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One message of a backend conversation, as emitted on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    Assistant { message: AssistantChunk },
    Result(TerminalSummary),
    /// `user`, `system` and anything newer than this crate.
    #[serde(other)]
    Other,
}

impl ConversationEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationEvent::Result(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssistantChunk {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub model: Option<String>,
}

impl AssistantChunk {
    pub fn text_blocks(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: Value,
        #[serde(default)]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Other,
}

/// Final event of a conversation: usage, cost, timing and the canonical result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalSummary {
    #[serde(default, skip_serializing)]
    pub subtype: String,
    #[serde(default)]
    pub num_turns: u32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub duration_api_ms: u64,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub usage: Option<Value>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub result: Option<String>,
}
