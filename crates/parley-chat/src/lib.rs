//! Conversation orchestration for Parley.
//!
//! The [`WorkspaceManager`] owns all workspaces and threads in memory, the
//! [`CompletionGateway`] turns a thread into a chat-completion call and the
//! [`ModelCatalog`] lists the models a provider offers. [`ChatSession`] ties
//! them together behind one lock and reports outcomes as notices.

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod session;

pub use catalog::{ModelCatalog, ModelQuery, QueryState};
pub use error::{ChatError, Result};
pub use gateway::{build_provider_messages, CompletionGateway};
pub use manager::WorkspaceManager;
pub use session::{ChatSession, SendTask};

// Re-export key types from parley-types
pub use parley_types::{
    Message, Notice, NoticeLevel, Notifier, Role, Thread, ThreadId, Workspace, WorkspaceId,
};
