use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{AgentBackend, AssistantChunk, BackendError, ContentBlock, ConversationEvent, EventStream, TerminalSummary};
use crate::config::BackendOptions;

/// One step of a scripted conversation.
#[derive(Debug, Clone)]
pub enum Step {
    Event(ConversationEvent),
    Fail(String),
}

/// In-process backend replaying a fixed script for every conversation.
///
/// Records how many conversations were opened and with which options.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Vec<Step>,
    open_error: Option<String>,
    panic_on_open: bool,
    opened: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(String, BackendOptions)>>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    /// `open_conversation` itself fails, before any event.
    pub fn failing_open(message: impl Into<String>) -> Self {
        Self {
            open_error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_open: true,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Prompts and options of every conversation opened so far.
    pub fn seen(&self) -> Vec<(String, BackendOptions)> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AgentBackend for ScriptedBackend {
    async fn open_conversation(
        &self,
        prompt: &str,
        options: &BackendOptions,
    ) -> Result<EventStream, BackendError> {
        if self.panic_on_open {
            panic!("scripted backend panic");
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((prompt.to_string(), options.clone()));
        }
        if let Some(message) = &self.open_error {
            return Err(BackendError::Runtime(message.clone()));
        }

        let items: Vec<Result<ConversationEvent, BackendError>> = self
            .script
            .iter()
            .cloned()
            .map(|step| match step {
                Step::Event(event) => Ok(event),
                Step::Fail(message) => Err(BackendError::Runtime(message)),
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Assistant chunk made of text blocks.
pub fn text(parts: &[&str]) -> Step {
    Step::Event(ConversationEvent::Assistant {
        message: AssistantChunk {
            content: parts
                .iter()
                .map(|t| ContentBlock::Text { text: t.to_string() })
                .collect(),
            model: None,
        },
    })
}

/// Terminal summary carrying `result` as the final text.
pub fn summary(result: &str) -> Step {
    Step::Event(ConversationEvent::Result(TerminalSummary {
        subtype: "success".to_string(),
        num_turns: 1,
        duration_ms: 10,
        duration_api_ms: 5,
        session_id: "scripted".to_string(),
        result: Some(result.to_string()),
        ..Default::default()
    }))
}
