pub mod backend;
pub mod config;
pub mod error;
pub mod manifest;

pub use backend::{AgentBackend, BackendError, ClaudeCli, ConversationEvent, EventStream, TerminalSummary};
pub use config::{keys, BackendOptions, ConfigBuilder, Defaults, EnvSettings, ExtraArgs, Layered, SettingsSource};
pub use error::ConfigError;
pub use manifest::{read_manifest, ManifestError, ManifestListing, ToolManifestEntry};
