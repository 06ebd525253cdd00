//! Listing of the MCP servers declared in the tool manifest.
//!
//! This is read independently of [`ConfigBuilder`](crate::ConfigBuilder): a
//! missing file is reported as an empty listing rather than an error.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest path not set (CLAUDE_MCP_CONFIG_PATH)")]
    PathNotSet,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain a JSON object at the top level", .path.display())]
    Malformed { path: PathBuf },
}

/// One declared server, normalised. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolManifestEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestListing {
    pub servers: Vec<ToolManifestEntry>,
    /// Set when the manifest file does not exist.
    pub missing: bool,
}

/// Reads and normalises the manifest at `path`. Never cached.
pub fn read_manifest(path: &Path) -> Result<ManifestListing, ManifestError> {
    if !path.exists() {
        return Ok(ManifestListing {
            servers: Vec::new(),
            missing: true,
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data: Value = serde_json::from_str(&raw).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(root) = data else {
        return Err(ManifestError::Malformed {
            path: path.to_path_buf(),
        });
    };

    Ok(ManifestListing {
        servers: entries(&root),
        missing: false,
    })
}

fn entries(root: &Map<String, Value>) -> Vec<ToolManifestEntry> {
    let servers = ["mcpServers", "servers"]
        .iter()
        .filter_map(|key| root.get(*key).and_then(Value::as_object))
        .find(|map| !map.is_empty());

    let Some(servers) = servers else {
        return Vec::new();
    };

    servers
        .iter()
        .filter_map(|(name, cfg)| {
            let cfg = cfg.as_object()?;
            Some(ToolManifestEntry {
                name: name.clone(),
                kind: first_string(cfg, &["type", "kind"]),
                url: first_string(cfg, &["url", "endpoint", "command"]),
                description: first_string(cfg, &["description", "comment"]),
            })
        })
        .collect()
}

fn first_string(cfg: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| cfg.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}
