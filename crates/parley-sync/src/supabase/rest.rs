use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{realtime, SupabaseConfig};
use crate::backend::{MessageStream, SyncBackend};
use crate::error::{Result, SyncError};
use crate::models::{
    NewSyncContext, NewSyncMessage, SyncContext, SyncMessage, CONTEXTS_TABLE, MESSAGES_TABLE,
};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

/// Hosted backend speaking PostgREST and Supabase Realtime
pub struct SupabaseBackend {
    http: Client,
    config: SupabaseConfig,
}

impl SupabaseBackend {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Insert one row and return the stored representation
    async fn insert_row<T, R>(&self, table: &str, row: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/rest/v1/{}", self.config.url, table);
        tracing::debug!(table, "Inserting row");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.config.bearer())
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SyncBackend for SupabaseBackend {
    async fn current_user_id(&self) -> Result<Option<String>> {
        let Some(token) = self.config.access_token.as_deref() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.config.url))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%status, "Access token rejected, continuing without a user");
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let user: AuthUser = serde_json::from_str(&response.text().await?)?;
        Ok(Some(user.id))
    }

    async fn insert_context(&self, context: NewSyncContext) -> Result<SyncContext> {
        self.insert_row(CONTEXTS_TABLE, &context).await
    }

    async fn insert_message(&self, message: NewSyncMessage) -> Result<SyncMessage> {
        self.insert_row(MESSAGES_TABLE, &message).await
    }

    async fn subscribe_messages(&self, context_id: &str) -> Result<MessageStream> {
        realtime::subscribe(&self.config, MESSAGES_TABLE, context_id).await
    }
}
