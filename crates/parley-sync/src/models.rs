use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONTEXTS_TABLE: &str = "mcp_contexts";
pub const MESSAGES_TABLE: &str = "mcp_messages";

/// Session-scoped context row. The backend owns ids and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncContext {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub session_id: Option<String>,
    pub context_type: String,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSyncContext {
    pub session_id: Option<String>,
    pub context_type: String,
    pub data: Value,
}

impl NewSyncContext {
    /// Context for the current authenticated session, with empty data
    pub fn session(session_id: Option<String>) -> Self {
        Self {
            session_id,
            context_type: "session".to_string(),
            data: Value::Object(Default::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMessageType {
    Request,
    Response,
    Notification,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub context_id: String,
    pub direction: Direction,
    pub message_type: SyncMessageType,
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// A message row before the backend assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSyncMessage {
    pub context_id: String,
    pub direction: Direction,
    pub message_type: SyncMessageType,
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewSyncMessage {
    pub fn new(
        context_id: impl Into<String>,
        direction: Direction,
        message_type: SyncMessageType,
        content: Value,
    ) -> Self {
        Self {
            context_id: context_id.into(),
            direction,
            message_type,
            content,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
