pub mod apis;
pub mod cors;
pub mod error;
pub mod http;
pub mod session;

pub use error::ErrorResponse;
pub use http::{router, start_server, ServerConfig, ServerState, CHAT_BODY_LIMIT};
pub use session::{AggregatedResponse, BridgeError, SessionBridge, DEFAULT_SYSTEM_PROMPT};
