use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::session::BridgeError;

/// Error body returned by every route: `{"error": <kind>, "detail": <message>}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    /// Route specific extra fields, serialized next to `error` and `detail`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorResponse {
    pub const BAD_REQUEST: &'static str = "bad_request";
    pub const LENGTH_REQUIRED: &'static str = "length_required";
    pub const PAYLOAD_TOO_LARGE: &'static str = "payload_too_large";
    pub const NOT_FOUND: &'static str = "not_found";
    pub const CONFIGURATION: &'static str = "configuration_error";
    pub const BACKEND: &'static str = "claude_sdk_error";
    pub const SERVER: &'static str = "server_error";
    pub const MCP_READ: &'static str = "mcp_read_error";

    pub fn new(kind: &str, detail: impl Into<String>) -> Self {
        Self {
            error: kind.to_string(),
            detail: detail.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(Self::BAD_REQUEST, detail)
    }

    pub fn length_required(detail: impl Into<String>) -> Self {
        Self::new(Self::LENGTH_REQUIRED, detail)
    }

    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        Self::new(Self::PAYLOAD_TOO_LARGE, detail)
    }

    pub fn not_found() -> Self {
        Self::new(Self::NOT_FOUND, "Not Found")
    }

    pub fn server_error(detail: impl Into<String>) -> Self {
        Self::new(Self::SERVER, detail)
    }

    pub fn mcp_read_error(detail: impl Into<String>, config_path: Option<String>) -> Self {
        Self::new(Self::MCP_READ, detail).with_field("config_path", config_path)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            Self::BAD_REQUEST => StatusCode::BAD_REQUEST,
            Self::LENGTH_REQUIRED => StatusCode::LENGTH_REQUIRED,
            Self::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NOT_FOUND => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<BridgeError> for ErrorResponse {
    fn from(err: BridgeError) -> Self {
        let kind = match &err {
            BridgeError::Config(_) => Self::CONFIGURATION,
            BridgeError::Backend(_) => Self::BACKEND,
            BridgeError::Internal(_) => Self::SERVER,
        };
        Self::new(kind, err.to_string())
    }
}

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found() -> ErrorResponse {
    ErrorResponse::not_found()
}
