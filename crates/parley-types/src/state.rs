use crate::config::{WorkspaceSettings, DEFAULT_MODEL, DEFAULT_THREAD_NAME, DEFAULT_WORKSPACE_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type WorkspaceId = Uuid;
pub type ThreadId = Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single conversation entry. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// An append-only conversation owned by a single workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    /// Model of the owning workspace, rewritten whenever the workspace model changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_model: Option<String>,
}

impl Thread {
    pub fn new(workspace_model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: DEFAULT_THREAD_NAME.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            workspace_model: Some(workspace_model.into()),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Model to send requests with, falling back to the global default
    pub fn model(&self) -> &str {
        self.workspace_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub model: String,
    pub threads: Vec<Thread>,
    pub settings: WorkspaceSettings,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            model: DEFAULT_MODEL.to_string(),
            threads: Vec::new(),
            settings: WorkspaceSettings::default(),
        }
    }

    pub fn thread(&self, thread_id: ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == thread_id)
    }

    pub fn thread_mut(&mut self, thread_id: ThreadId) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|t| t.id == thread_id)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_role_rejects_unknown_value() {
        let result: Result<Role, _> = serde_json::from_str("\"system\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_thread_model_fallback() {
        let mut thread = Thread::new("openai/gpt-4o");
        assert_eq!(thread.model(), "openai/gpt-4o");

        thread.workspace_model = None;
        assert_eq!(thread.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_new_workspace_defaults() {
        let workspace = Workspace::new();
        assert_eq!(workspace.name, "New Workspace");
        assert_eq!(workspace.model, DEFAULT_MODEL);
        assert!(workspace.threads.is_empty());
        assert_eq!(workspace.settings, WorkspaceSettings::default());
    }

    #[test]
    fn test_thread_json_shape() {
        let mut thread = Thread::new("m");
        thread.push(Message::user("hi"));

        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["workspaceModel"], "m");
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
