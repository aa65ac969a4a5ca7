use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley_api::{build_router, config::Config, state::AppState};
use parley_chat::{ChatSession, CompletionGateway};
use parley_persist::{FileSettingsStore, Settings};
use parley_sync::{
    MessageHandler, SupabaseBackend, SyncBridge, SyncBridgeConfig, SyncMessage, SyncSession,
};
use parley_types::NoticeBoard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Parley API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let store = FileSettingsStore::open(&config.storage.settings_path).with_context(|| {
        format!(
            "Failed to open settings file {}",
            config.storage.settings_path.display()
        )
    })?;
    tracing::info!(path = %store.path().display(), "Settings store ready");

    let gateway = CompletionGateway::new(Settings::new(Arc::new(store)))
        .with_base_url(config.provider.base_url.clone())
        .with_referer(config.provider.referer.clone());
    let notices = Arc::new(NoticeBoard::new(config.storage.notice_capacity));
    let session = ChatSession::new(gateway, notices.clone());

    let sync_session = start_sync(&config).await;

    let state = Arc::new(
        AppState::new(config.clone(), session, notices).with_sync_enabled(sync_session.is_some()),
    );
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sync) = sync_session {
        sync.close();
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Logs messages pushed into this session's sync context
struct LogIncoming;

#[async_trait]
impl MessageHandler for LogIncoming {
    async fn handle(&self, message: SyncMessage) -> anyhow::Result<()> {
        tracing::info!(
            message_id = %message.id,
            direction = ?message.direction,
            message_type = ?message.message_type,
            "Sync message received"
        );
        Ok(())
    }
}

async fn start_sync(config: &Config) -> Option<SyncSession> {
    let Some(supabase) = config.supabase() else {
        tracing::info!("Supabase not configured, sync disabled");
        return None;
    };

    let bridge = SyncBridge::new(
        Arc::new(SupabaseBackend::new(supabase)),
        SyncBridgeConfig::new()
            .on_message(LogIncoming)
            .on_error(|e| tracing::warn!("Sync error: {}", e)),
    );

    match bridge.initialize().await {
        Ok(session) => {
            tracing::info!(context_id = %session.context_id(), "Sync bridge started");
            Some(session)
        }
        Err(e) => {
            tracing::warn!("Failed to start sync bridge: {}", e);
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
