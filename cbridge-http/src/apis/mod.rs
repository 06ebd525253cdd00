pub mod chat;
pub mod health;
pub mod mcp;

pub use chat::handle_chat;
pub use health::handle_health;
pub use mcp::handle_list_servers;
