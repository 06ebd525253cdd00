use axum::{extract::State, Json};
use serde::Serialize;

use crate::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub host: String,
    pub port: u16,
}

/// GET /health - liveness only, never touches the backend or its config
pub async fn handle_health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        host: state.defaults.host.clone(),
        port: state.defaults.port,
    })
}
