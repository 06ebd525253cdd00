use axum::{extract::State, Json};
use cbridge_core::{keys, read_manifest, ManifestError, ToolManifestEntry};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::{ErrorResponse, ServerState};

#[derive(Debug, Serialize)]
pub struct ServerListing {
    pub config_path: String,
    pub servers: Vec<ToolManifestEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /mcp, /mcp/servers - MCP servers declared in the configured manifest
///
/// A manifest path that does not exist yields an empty list, not a failure.
pub async fn handle_list_servers(
    State(state): State<ServerState>,
) -> Result<Json<ServerListing>, ErrorResponse> {
    let Some(path) = state.settings.value(keys::MCP_CONFIG_PATH).map(PathBuf::from) else {
        let err = ManifestError::PathNotSet;
        error!("MCP list failed: {}", err);
        return Err(ErrorResponse::mcp_read_error(err.to_string(), None));
    };
    let config_path = path.to_string_lossy().into_owned();

    match read_manifest(&path) {
        Ok(listing) => {
            let error = listing.missing.then(|| {
                warn!("MCP config file not found at {}", config_path);
                format!("manifest not found at {}", config_path)
            });
            info!("GET /mcp {} servers from {}", listing.servers.len(), config_path);
            Ok(Json(ServerListing {
                config_path,
                servers: listing.servers,
                error,
            }))
        }
        Err(err) => {
            error!("MCP list failed: {}", err);
            Err(ErrorResponse::mcp_read_error(err.to_string(), Some(config_path)))
        }
    }
}
