mod bridge;

pub use bridge::{AggregatedResponse, SessionBridge, DEFAULT_SYSTEM_PROMPT};
pub(crate) use bridge::preview;

use cbridge_core::{BackendError, ConfigError};
use thiserror::Error;

/// Why one chat request produced no answer.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The conversation task died without an outcome (panic or abort).
    #[error("conversation task failed: {0}")]
    Internal(String),
}
