use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::backend::{MessageStream, SyncBackend};
use crate::error::{Result, SyncError};
use crate::models::{NewSyncContext, NewSyncMessage, SyncContext, SyncMessage};

const CHANGE_FEED_CAPACITY: usize = 256;

/// In-process backend with the same insert and change-feed semantics as the
/// hosted one. Used for local runs without a backend and in tests.
pub struct MemoryBackend {
    user_id: Option<String>,
    contexts: Mutex<Vec<SyncContext>>,
    messages: Mutex<Vec<SyncMessage>>,
    changes: broadcast::Sender<SyncMessage>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            user_id: None,
            contexts: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            changes,
        }
    }

    /// Act as if `user_id` is signed in
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn contexts(&self) -> Vec<SyncContext> {
        self.contexts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn messages(&self) -> Vec<SyncMessage> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncBackend for MemoryBackend {
    async fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.user_id.clone())
    }

    async fn insert_context(&self, context: NewSyncContext) -> Result<SyncContext> {
        let now = Utc::now();
        let row = SyncContext {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            session_id: context.session_id,
            context_type: context.context_type,
            data: context.data,
            ttl: None,
        };

        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        Ok(row)
    }

    async fn insert_message(&self, message: NewSyncMessage) -> Result<SyncMessage> {
        let row = SyncMessage {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            context_id: message.context_id,
            direction: message.direction,
            message_type: message.message_type,
            content: message.content,
            metadata: message.metadata,
        };

        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());

        // No subscribers is fine
        let _ = self.changes.send(row.clone());
        Ok(row)
    }

    async fn subscribe_messages(&self, context_id: &str) -> Result<MessageStream> {
        let mut rx = self.changes.subscribe();
        let context_id = context_id.to_string();

        let stream = async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(message) if message.context_id == context_id => yield Ok(message),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        yield Err(SyncError::Subscription(format!(
                            "change feed lagged, {} messages skipped",
                            skipped
                        )));
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
