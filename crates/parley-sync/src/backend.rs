use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::Result;
use crate::models::{NewSyncContext, NewSyncMessage, SyncContext, SyncMessage};

/// Push feed of message inserts for one context
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<SyncMessage>> + Send>>;

/// Table-like operations plus a change feed, as offered by the hosted backend
///
/// Implementations provide backend-specific inserts and subscriptions.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Id of the authenticated user, if any
    async fn current_user_id(&self) -> Result<Option<String>>;

    /// Insert a context row and return it as stored
    async fn insert_context(&self, context: NewSyncContext) -> Result<SyncContext>;

    /// Insert a message row and return it as stored
    async fn insert_message(&self, message: NewSyncMessage) -> Result<SyncMessage>;

    /// Subscribe to message inserts whose `context_id` matches.
    ///
    /// The subscription is active once this returns; inserts made afterwards
    /// are delivered. Nothing is replayed.
    async fn subscribe_messages(&self, context_id: &str) -> Result<MessageStream>;
}
