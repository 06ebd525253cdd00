mod claude;
mod event;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;

pub use claude::{build_args, ClaudeCli};
pub use event::{AssistantChunk, ContentBlock, ConversationEvent, TerminalSummary};

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

use crate::config::BackendOptions;

/// Lazy, ordered event sequence of one conversation.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ConversationEvent, BackendError>> + Send>>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Claude Code CLI not found (looked for {searched})")]
    CliNotFound { searched: String },

    #[error("failed to start Claude Code CLI: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to read from Claude Code CLI: {0}")]
    Io(#[source] std::io::Error),

    #[error("failed to decode CLI output {line:?}: {source}")]
    Decode {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Claude Code CLI exited with {}: {stderr}", .exit_code.map_or("signal".to_string(), |c| format!("code {c}")))]
    Process {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("{0}")]
    Runtime(String),
}

/// The agent runtime a conversation is opened against.
///
/// Every call must return a fresh, independent conversation; implementations
/// never pool or reuse sessions.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn open_conversation(
        &self,
        prompt: &str,
        options: &BackendOptions,
    ) -> Result<EventStream, BackendError>;
}
