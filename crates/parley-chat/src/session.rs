use parley_persist::Settings;
use parley_types::{Message, Notice, Notifier, Thread, ThreadId, Workspace, WorkspaceId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::catalog::ModelCatalog;
use crate::error::{ChatError, Result};
use crate::gateway::CompletionGateway;
use crate::manager::WorkspaceManager;

/// Everything a chat view needs: workspace state, the completion gateway,
/// settings and a place to send notices.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ChatSession {
    manager: Arc<RwLock<WorkspaceManager>>,
    gateway: CompletionGateway,
    notifier: Arc<dyn Notifier>,
}

impl ChatSession {
    pub fn new(gateway: CompletionGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            manager: Arc::new(RwLock::new(WorkspaceManager::new())),
            gateway,
            notifier,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.gateway.settings()
    }

    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::new(self.gateway.clone())
    }

    pub async fn workspaces(&self) -> Vec<Workspace> {
        self.manager.read().await.workspaces().to_vec()
    }

    pub async fn workspace(&self, workspace_id: WorkspaceId) -> Option<Workspace> {
        self.manager.read().await.workspace(workspace_id).cloned()
    }

    pub async fn thread(&self, thread_id: ThreadId) -> Option<Thread> {
        self.manager.read().await.thread(thread_id).cloned()
    }

    pub async fn create_workspace(&self) -> Workspace {
        let workspace = self.manager.write().await.create_workspace().clone();
        self.notifier.notify(Notice::success("New workspace created"));
        workspace
    }

    pub async fn create_thread(&self, workspace_id: WorkspaceId) -> Result<Thread> {
        let thread = self
            .manager
            .write()
            .await
            .create_thread(workspace_id)
            .cloned()
            .ok_or(ChatError::WorkspaceNotFound(workspace_id))?;
        self.notifier.notify(Notice::success("New thread created"));
        Ok(thread)
    }

    pub async fn change_workspace_model(
        &self,
        workspace_id: WorkspaceId,
        model: &str,
    ) -> Result<Workspace> {
        let workspace = {
            let mut manager = self.manager.write().await;
            if !manager.change_workspace_model(workspace_id, model) {
                return Err(ChatError::WorkspaceNotFound(workspace_id));
            }
            manager.workspace(workspace_id).cloned()
        }
        .ok_or(ChatError::WorkspaceNotFound(workspace_id))?;

        self.notifier.notify(Notice::success("Model updated successfully"));
        Ok(workspace)
    }

    /// Append `input` to the thread as a user message, then ask the provider
    /// for a reply and append that.
    ///
    /// The user message stays even if the request fails. Failures raise one
    /// notice and are returned.
    pub async fn send_message(&self, thread_id: ThreadId, input: &str) -> Result<Message> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let (model, history) = {
            let mut manager = self.manager.write().await;
            if !manager.append_message(thread_id, Message::user(input)) {
                return Err(ChatError::ThreadNotFound(thread_id));
            }
            let thread = manager
                .thread(thread_id)
                .ok_or(ChatError::ThreadNotFound(thread_id))?;
            (thread.model().to_string(), thread.messages.clone())
        };

        match self.gateway.complete(&model, &history).await {
            Ok(content) => {
                let reply = Message::assistant(content);
                if !self
                    .manager
                    .write()
                    .await
                    .append_message(thread_id, reply.clone())
                {
                    tracing::warn!(%thread_id, "Thread disappeared before reply arrived");
                }
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(%thread_id, "Error sending message: {}", e);
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Run `send_message` in the background. The returned task owns the
    /// request: dropping or cancelling it discards any late reply.
    pub fn spawn_send(&self, thread_id: ThreadId, input: impl Into<String>) -> SendTask {
        let session = self.clone();
        let input = input.into();
        let handle = tokio::spawn(async move { session.send_message(thread_id, &input).await });
        SendTask { handle }
    }

    pub fn save_openrouter_key(&self, key: &str) -> Result<()> {
        self.save_setting(|s| s.save_openrouter_key(key), "OpenRouter API Key Saved")
    }

    pub fn save_gemini_key(&self, key: &str) -> Result<()> {
        self.save_setting(|s| s.save_gemini_key(key), "Gemini API Key Saved")
    }

    pub fn set_system_prompt(&self, prompt: &str) -> Result<()> {
        self.save_setting(|s| s.set_system_prompt(prompt), "System Prompt Updated")
    }

    fn save_setting<F>(&self, save: F, success: &str) -> Result<()>
    where
        F: FnOnce(&Settings) -> parley_persist::error::Result<()>,
    {
        match save(self.settings()) {
            Ok(()) => {
                self.notifier.notify(Notice::success(success));
                Ok(())
            }
            Err(e) => {
                let e = ChatError::from(e);
                self.report(&e);
                Err(e)
            }
        }
    }

    fn report(&self, error: &ChatError) {
        if let Some(notice) = error.user_notice() {
            self.notifier.notify(notice);
        }
    }
}

/// Handle to a background send. Aborts the send when dropped.
pub struct SendTask {
    handle: JoinHandle<Result<Message>>,
}

impl SendTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the reply. `None` if the task was cancelled or panicked.
    pub async fn join(mut self) -> Option<Result<Message>> {
        match (&mut self.handle).await {
            Ok(result) => Some(result),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::error!("Send task failed: {}", e);
                None
            }
        }
    }
}

impl Drop for SendTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
