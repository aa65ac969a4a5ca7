//! Conversation sync bridge.
//!
//! Creates a session-scoped context row in a hosted backend, subscribes to
//! message inserts for that context, and hands each pushed row to a
//! registered handler. Outgoing messages are plain inserts.

pub mod backend;
pub mod bridge;
pub mod error;
pub mod memory;
pub mod models;
pub mod supabase;

pub use backend::{MessageStream, SyncBackend};
pub use bridge::{ErrorCallback, MessageHandler, SyncBridge, SyncBridgeConfig, SyncSession};
pub use error::SyncError;
pub use memory::MemoryBackend;
pub use models::{
    Direction, NewSyncContext, NewSyncMessage, SyncContext, SyncMessage, SyncMessageType,
    CONTEXTS_TABLE, MESSAGES_TABLE,
};
pub use supabase::{SupabaseBackend, SupabaseConfig};
