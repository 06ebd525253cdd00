use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use cbridge_core::{AgentBackend, BackendOptions, ClaudeCli, Defaults, EnvSettings, Layered, SettingsSource};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::apis;
use crate::cors::cors;
use crate::error::not_found;
use crate::session::SessionBridge;

/// Configuration for the HTTP server
#[derive(Clone)]
pub struct ServerConfig {
    /// Startup values: bind host/port and the fallback manifest path
    pub defaults: Defaults,
    /// Where per-request backend options are read from
    pub settings: Arc<dyn SettingsSource>,
    /// Options used for every chat instead of rebuilding them per request
    pub options: Option<BackendOptions>,
    pub backend: Arc<dyn AgentBackend>,
}

impl ServerConfig {
    /// Live environment over `defaults`, talking to the `claude` CLI found on the system
    pub fn new(defaults: Defaults) -> Self {
        Self {
            settings: Arc::new(Layered::new(EnvSettings, defaults.clone())),
            defaults,
            options: None,
            backend: Arc::new(ClaudeCli::new()),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn AgentBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsSource>) -> Self {
        self.settings = settings;
        self
    }

    /// Skip per-request option building and use these for every chat
    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn address(&self) -> String {
        self.defaults.address()
    }
}

/// Read-only state shared by all requests
#[derive(Clone)]
pub struct ServerState {
    pub bridge: SessionBridge,
    pub settings: Arc<dyn SettingsSource>,
    pub defaults: Arc<Defaults>,
    pub options: Option<Arc<BackendOptions>>,
}

impl From<ServerConfig> for ServerState {
    fn from(config: ServerConfig) -> Self {
        Self {
            bridge: SessionBridge::new(config.backend),
            settings: config.settings,
            defaults: Arc::new(config.defaults),
            options: config.options.map(Arc::new),
        }
    }
}

/// Largest `/chat` body accepted; bigger ones are rejected with 413.
pub const CHAT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// All routes, with CORS and request tracing applied to every response
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(apis::handle_health).fallback(not_found))
        .route("/mcp", get(apis::handle_list_servers).fallback(not_found))
        .route("/mcp/servers", get(apis::handle_list_servers).fallback(not_found))
        .route(
            "/chat",
            post(apis::handle_chat)
                .fallback(not_found)
                .layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT)),
        )
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(cors)),
        )
        .with_state(state)
}

/// Start the HTTP server and serve until Ctrl+C
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let address = config.address();
    let manifest = config.settings.value(cbridge_core::keys::MCP_CONFIG_PATH);
    let app = router(ServerState::from(config));

    let listener = tokio::net::TcpListener::bind(&address).await?;

    println!("Claude bridge listening on \x1b[1mhttp://{}\x1b[0m", address);
    println!("\nAvailable endpoints:");
    println!("  \x1b[1mGET  /health\x1b[0m              - Liveness check");
    println!("  \x1b[1mGET  /mcp\x1b[0m                 - MCP servers from the manifest (alias /mcp/servers)");
    println!("  \x1b[1mPOST /chat\x1b[0m                - Run one prompt, body {{\"prompt\": \"...\"}}");
    match manifest {
        Some(path) => println!("\nMCP manifest: \x1b[2m{}\x1b[0m", path),
        None => println!("\nMCP manifest: \x1b[2mnot set, /chat will fail until CLAUDE_MCP_CONFIG_PATH is set\x1b[0m"),
    }
    println!("\nPress Ctrl+C to stop\n");

    info!("HTTP server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutting down server");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
