use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::backend::{MessageStream, SyncBackend};
use crate::error::{Result, SyncError};
use crate::models::{NewSyncContext, NewSyncMessage, SyncContext, SyncMessage};

/// Receives every message inserted into the session's context
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: SyncMessage) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> MessageHandler for F
where
    F: Fn(SyncMessage) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn handle(&self, message: SyncMessage) -> anyhow::Result<()> {
        (self)(message).await
    }
}

pub type ErrorCallback = Arc<dyn Fn(SyncError) + Send + Sync>;

#[derive(Clone, Default)]
pub struct SyncBridgeConfig {
    pub on_message: Option<Arc<dyn MessageHandler>>,
    pub on_error: Option<ErrorCallback>,
}

impl SyncBridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message(mut self, handler: impl MessageHandler + 'static) -> Self {
        self.on_message = Some(Arc::new(handler));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(SyncError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

/// Mirrors a session into the backend and relays inserted messages back
pub struct SyncBridge {
    backend: Arc<dyn SyncBackend>,
    config: SyncBridgeConfig,
}

impl SyncBridge {
    pub fn new(backend: Arc<dyn SyncBackend>, config: SyncBridgeConfig) -> Self {
        Self { backend, config }
    }

    /// Create the session context and start relaying its inserts.
    ///
    /// Creation and subscription failures are returned; failures after that
    /// go to `on_error`.
    pub async fn initialize(&self) -> Result<SyncSession> {
        let session_id = self.backend.current_user_id().await?;
        if session_id.is_none() {
            tracing::warn!("No authenticated user, creating anonymous sync context");
        }

        let context = self
            .backend
            .insert_context(NewSyncContext::session(session_id))
            .await
            .map_err(|e| {
                tracing::error!("Error creating sync context: {}", e);
                e
            })?;
        tracing::info!(context_id = %context.id, "Created sync context");

        let stream = self.backend.subscribe_messages(&context.id).await?;
        let task = tokio::spawn(relay(
            stream,
            self.config.on_message.clone(),
            self.config.on_error.clone(),
        ));

        Ok(SyncSession { context, task })
    }

    /// Insert one message row. Errors are logged and returned.
    pub async fn send_message(&self, message: NewSyncMessage) -> Result<SyncMessage> {
        match self.backend.insert_message(message).await {
            Ok(stored) => {
                tracing::debug!(message_id = %stored.id, context_id = %stored.context_id, "Sent sync message");
                Ok(stored)
            }
            Err(e) => {
                tracing::error!("Error sending sync message: {}", e);
                Err(e)
            }
        }
    }
}

async fn relay(
    mut stream: MessageStream,
    handler: Option<Arc<dyn MessageHandler>>,
    on_error: Option<ErrorCallback>,
) {
    while let Some(item) = stream.next().await {
        match item {
            Ok(message) => {
                tracing::debug!(message_id = %message.id, "Received sync message");
                let Some(handler) = handler.as_ref() else {
                    continue;
                };
                if let Err(e) = handler.handle(message).await {
                    tracing::error!("Error handling sync message: {:#}", e);
                    report(&on_error, SyncError::Handler(format!("{:#}", e)));
                }
            }
            Err(e) => {
                tracing::error!("Sync subscription error: {}", e);
                report(&on_error, e);
            }
        }
    }
    tracing::debug!("Sync subscription ended");
}

fn report(on_error: &Option<ErrorCallback>, error: SyncError) {
    if let Some(callback) = on_error {
        callback(error);
    }
}

/// A live sync session. Dropping it cancels the subscription.
pub struct SyncSession {
    context: SyncContext,
    task: JoinHandle<()>,
}

impl SyncSession {
    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    pub fn context_id(&self) -> &str {
        &self.context.id
    }

    /// False once the feed ended or the session was closed
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn close(self) {
        tracing::info!(context_id = %self.context.id, "Closing sync session");
        self.task.abort();
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}
