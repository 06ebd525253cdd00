mod builder;
mod options;
mod settings;

pub use builder::{ConfigBuilder, DEFAULT_PERMISSION_MODE};
pub use options::{BackendOptions, ExtraArgs};
pub use settings::{Defaults, EnvSettings, Layered, SettingsSource};

/// Setting keys understood by [`ConfigBuilder`] and the server bootstrap.
pub mod keys {
    pub const HOST: &str = "CLAUDE_BRIDGE_HOST";
    pub const PORT: &str = "CLAUDE_BRIDGE_PORT";
    pub const PERMISSION_MODE: &str = "CLAUDE_PERMISSION_MODE";
    pub const ALLOWED_TOOLS: &str = "CLAUDE_ALLOWED_TOOLS";
    pub const DISALLOWED_TOOLS: &str = "CLAUDE_DISALLOWED_TOOLS";
    pub const MODEL: &str = "CLAUDE_MODEL";
    pub const MAX_TURNS: &str = "CLAUDE_MAX_TURNS";
    pub const CWD: &str = "CLAUDE_CWD";
    pub const MCP_CONFIG_PATH: &str = "CLAUDE_MCP_CONFIG_PATH";
    pub const SYSTEM_PROMPT: &str = "CLAUDE_SYSTEM_PROMPT";
    pub const EXTRA_ARGS: &str = "CLAUDE_EXTRA_ARGS";
    pub const CLI_PATH: &str = "CLAUDE_CLI_PATH";
}
