//! Core types shared by every Parley crate: workspaces, threads, messages
//! and the user-visible notices emitted when operations succeed or fail.

pub mod config;
pub mod events;
pub mod state;

pub use config::{
    WorkspaceSettings, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_THREAD_NAME, DEFAULT_WORKSPACE_NAME,
};
pub use events::{Notice, NoticeBoard, NoticeLevel, Notifier, TracingNotifier};
pub use state::{Message, Role, Thread, ThreadId, Workspace, WorkspaceId};
