//! # Parley
//!
//! Core of a multi-workspace LLM chat client.
//!
//! ## Overview
//!
//! - **Workspaces and threads** held in memory, each thread remembering the
//!   model of its workspace
//! - **Completions** through OpenRouter, with a global system prompt
//! - **Model catalog** queries with loading, error and success states
//! - **Settings** (API keys, system prompt) in a durable JSON file
//! - **Sync** of session messages through Supabase Realtime
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new(Arc::new(FileSettingsStore::open("settings.json")?));
//!     settings.save_openrouter_key(&std::env::var("OPENROUTER_API_KEY")?)?;
//!
//!     let notices = Arc::new(NoticeBoard::default());
//!     let session = ChatSession::new(CompletionGateway::new(settings), notices.clone());
//!
//!     let workspace = session.create_workspace().await;
//!     let thread = session.create_thread(workspace.id).await?;
//!
//!     let reply = session.send_message(thread.id, "Hello!").await?;
//!     println!("{}", reply.content);
//!
//!     for notice in notices.drain() {
//!         println!("[{:?}] {}", notice.level, notice.message);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`parley-types`**: workspaces, threads, messages, notices
//! - **`parley-llm`**: OpenRouter chat-completion and model list client
//! - **`parley-persist`**: settings store
//! - **`parley-chat`**: workspace manager, completion gateway, model catalog
//! - **`parley-sync`**: Supabase-backed conversation sync bridge

pub mod prelude;

pub use parley_types::{
    Message, Notice, NoticeBoard, NoticeLevel, Notifier, Role, Thread, ThreadId,
    TracingNotifier, Workspace, WorkspaceId, WorkspaceSettings, DEFAULT_MODEL,
};

pub use parley_llm::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, ClientFactory, LLMClient,
    Message as ProviderMessage, ModelCatalogClient, ModelInfo, OpenRouterClient, ProviderConfig,
};

pub use parley_persist::{
    FileSettingsStore, MemorySettingsStore, PersistError, Settings, SettingsSnapshot,
    SettingsStore,
};

pub use parley_chat::{
    build_provider_messages, ChatError, ChatSession, CompletionGateway, ModelCatalog,
    ModelQuery, QueryState, SendTask, WorkspaceManager,
};

pub use parley_sync::{
    MemoryBackend, MessageHandler, SupabaseBackend, SupabaseConfig, SyncBackend, SyncBridge,
    SyncBridgeConfig, SyncError, SyncMessage, SyncSession,
};
