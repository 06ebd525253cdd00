use std::path::PathBuf;
use thiserror::Error;

/// Required backend settings are missing or point at nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("manifest path not set (CLAUDE_MCP_CONFIG_PATH)")]
    ManifestPathNotSet,

    #[error("manifest not found at {}", .0.display())]
    ManifestNotFound(PathBuf),
}
