use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_LENGTH, StatusCode},
};
use cbridge_core::TerminalSummary;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::ErrorResponse;

/// Validated body of `POST /chat`.
///
/// Rejections: no `Content-Length` is 411, a body over the route's limit is
/// 413, a bad length, a non-JSON body or a missing/blank `prompt` is 400.
#[derive(Debug, Clone)]
pub struct ChatQuery {
    /// Prompt exactly as sent, echoed back in the response.
    pub prompt: String,
}

impl<S> FromRequest<S> for ChatQuery
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Some(length) = req.headers().get(CONTENT_LENGTH) else {
            return Err(ErrorResponse::length_required("Content-Length required"));
        };
        if length
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .is_none()
        {
            return Err(ErrorResponse::bad_request("Invalid Content-Length"));
        }

        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            error!("Failed to read request body: {}", rejection.body_text());
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ErrorResponse::payload_too_large(rejection.body_text())
            } else {
                ErrorResponse::bad_request(rejection.body_text())
            }
        })?;

        let data: Value = serde_json::from_slice(&body)
            .map_err(|_| ErrorResponse::bad_request("Body must be JSON"))?;

        match data.get("prompt").and_then(Value::as_str) {
            Some(prompt) if !prompt.trim().is_empty() => Ok(Self {
                prompt: prompt.to_string(),
            }),
            _ => Err(ErrorResponse::bad_request(
                "'prompt' field must be a non-empty string",
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub prompt: String,
    pub response: String,
    pub result: Option<TerminalSummary>,
}
