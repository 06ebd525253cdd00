use axum::{extract::State, Json};
use cbridge_core::ConfigBuilder;
use tracing::{error, info};
use uuid::Uuid;

use super::types::{ChatQuery, ChatResponse};
use crate::session::{preview, AggregatedResponse, BridgeError};
use crate::{ErrorResponse, ServerState};

/// POST /chat - one prompt, one fresh conversation, one JSON answer
pub async fn handle_chat(
    State(state): State<ServerState>,
    payload: ChatQuery,
) -> Result<Json<ChatResponse>, ErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    info!("[{}] POST /chat prompt={:?}", request_id, preview(&payload.prompt));

    match answer(&state, &request_id, payload.prompt.trim()).await {
        Ok(response) => {
            info!(
                "[{}] Chat response prompt={:?} response={:?} has_result={}",
                request_id,
                preview(&payload.prompt),
                preview(&response.text),
                response.result.is_some()
            );
            Ok(Json(ChatResponse {
                prompt: payload.prompt,
                response: response.text,
                result: response.result,
            }))
        }
        Err(err) => {
            error!(
                "[{}] Chat failed prompt={:?}: {}",
                request_id,
                preview(&payload.prompt),
                err
            );
            Err(err.into())
        }
    }
}

/// Options come from the server's preset if it has one, otherwise they are
/// rebuilt from the live settings for this request.
async fn answer(
    state: &ServerState,
    request_id: &str,
    prompt: &str,
) -> Result<AggregatedResponse, BridgeError> {
    let options = match &state.options {
        Some(options) => options.as_ref().clone(),
        None => ConfigBuilder::new(state.settings.as_ref()).build()?,
    };
    state.bridge.run(request_id, prompt, options).await
}
