//! Docent application binary - composition root.
//!
//! Ties together all Docent crates into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Validate the backend base URL (fatal if missing or malformed)
//! 3. Build the backend client, conversation store, and turn orchestrator
//! 4. Start the axum message server

use std::sync::Arc;

use clap::Parser;

use docent_api::{create_router, AppState};
use docent_chat::{ConversationStore, MemoryStore, TurnOrchestrator};
use docent_client::{Backend, BackendClient};
use docent_core::config::DocentConfig;

mod cli;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first: the log level default comes from it.
    let config_file = args.resolve_config_path();
    let mut config = DocentConfig::load_or_default(&config_file);
    if let Some(url) = args.resolve_backend_url() {
        config.backend.base_url = url;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.general.log_level.clone())
            }),
        )
        .init();

    tracing::info!("Starting Docent v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // A bad backend URL would fail every turn; refuse to start instead.
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    // Backend gateway.
    let backend: Arc<dyn Backend> = Arc::new(BackendClient::new(&config.backend));
    tracing::info!(base_url = %config.backend.base_url, "Backend client ready");

    // Conversation state and orchestrator.
    let store: Arc<dyn ConversationStore> = Arc::new(MemoryStore::new());
    let orchestrator = TurnOrchestrator::new(
        backend,
        store,
        config.router.clone(),
        config.upload.clone(),
    );

    let state = AppState::new(Arc::new(orchestrator));

    // === Message server ===

    let port = args.resolve_port(config.general.port);
    let addr = format!("127.0.0.1:{}", port);

    let router = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind — is another instance running?");
            tracing::error!("Try: DOCENT_PORT={} cargo run -p docent-app", port + 1);
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "Message server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
