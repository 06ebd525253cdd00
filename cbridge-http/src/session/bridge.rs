use cbridge_core::{AgentBackend, BackendError, BackendOptions, ConfigError, ConversationEvent, TerminalSummary};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::BridgeError;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a command-line helper. When the user requests a resource, \
download it with curl, save it to an explicit local filepath, and report that path in your final \
message. If URLs are produced, include them in the final response alongside the saved file paths. \
You must satisfy requests exclusively through the provided MCP tools and must not fall back to \
non-MCP services; if an MCP tool cannot be used, return an explicit error instead of switching to \
a different provider.";

const PREVIEW_CHARS: usize = 200;

/// Text and terminal summary folded out of one conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedResponse {
    pub text: String,
    pub result: Option<TerminalSummary>,
}

/// Opens one backend conversation per call and folds its events into an
/// [`AggregatedResponse`].
#[derive(Clone)]
pub struct SessionBridge {
    backend: Arc<dyn AgentBackend>,
}

impl SessionBridge {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self { backend }
    }

    /// Runs `prompt` to completion.
    ///
    /// The conversation is driven on its own task: if the caller goes away the
    /// conversation still runs to its end, and a panic inside it comes back as
    /// [`BridgeError::Internal`] instead of tearing down the caller.
    pub async fn run(
        &self,
        request_id: &str,
        prompt: &str,
        mut options: BackendOptions,
    ) -> Result<AggregatedResponse, BridgeError> {
        let Some(mcp_config) = options.mcp_config.clone() else {
            return Err(ConfigError::ManifestPathNotSet.into());
        };
        if options.system_prompt.is_none() {
            options.system_prompt = Some(DEFAULT_SYSTEM_PROMPT.to_string());
        }

        info!(
            "[{}] Claude start prompt={:?} allowed_tools={:?} mcp_config={}",
            request_id,
            preview(prompt),
            options.allowed_tools,
            mcp_config.display()
        );
        debug!("[{}] System prompt: {:?}", request_id, options.system_prompt);

        let backend = self.backend.clone();
        let owned_prompt = prompt.to_string();
        let conversation =
            tokio::spawn(async move { converse(backend.as_ref(), &owned_prompt, &options).await });

        let response = conversation
            .await
            .map_err(|e| BridgeError::Internal(e.to_string()))??;

        match &response.result {
            Some(summary) => {
                if summary.is_error {
                    warn!("[{}] Backend reported an error result ({})", request_id, summary.subtype);
                }
                info!(
                    "[{}] Claude done response={:?} turns={} duration_ms={} cost_usd={:?} session={}",
                    request_id,
                    preview(&response.text),
                    summary.num_turns,
                    summary.duration_ms,
                    summary.total_cost_usd,
                    summary.session_id
                );
            }
            None => warn!(
                "[{}] Conversation ended without a result event response={:?}",
                request_id,
                preview(&response.text)
            ),
        }

        Ok(response)
    }
}

/// Single in-order pass over the events; stops at the first terminal summary.
async fn converse(
    backend: &dyn AgentBackend,
    prompt: &str,
    options: &BackendOptions,
) -> Result<AggregatedResponse, BackendError> {
    let mut events = backend.open_conversation(prompt, options).await?;
    let mut text = String::new();
    let mut result = None;

    while let Some(event) = events.next().await {
        match event? {
            ConversationEvent::Assistant { message } => {
                for block in message.text_blocks() {
                    text.push_str(block);
                }
            }
            ConversationEvent::Result(summary) => {
                result = Some(summary);
                break;
            }
            ConversationEvent::Other => {}
        }
    }

    Ok(AggregatedResponse {
        text: text.trim().to_string(),
        result,
    })
}

/// First characters of `text`, for log lines.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
