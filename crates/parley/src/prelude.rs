//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use parley::prelude::*;
//! ```

pub use crate::{
    ChatError, ChatSession, CompletionGateway, FileSettingsStore, LLMClient, MemorySettingsStore,
    Message, ModelCatalog, ModelQuery, Notice, NoticeBoard, Notifier, QueryState, Role,
    SendTask, Settings, SettingsStore, SyncBridge, SyncBridgeConfig, Thread, Workspace,
};
