pub mod handler;
pub mod types;

pub use handler::handle_chat;
pub use types::{ChatQuery, ChatResponse};
