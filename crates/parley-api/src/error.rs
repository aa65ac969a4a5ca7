use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley_chat::ChatError;
use parley_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Internal server error")]
    Internal,
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        // Prefer the text a user would have seen as a notice
        let shown = error
            .user_notice()
            .map(|n| n.message)
            .unwrap_or_else(|| error.to_string());

        match error {
            ChatError::WorkspaceNotFound(id) => ApiError::WorkspaceNotFound(id.to_string()),
            ChatError::ThreadNotFound(id) => ApiError::ThreadNotFound(id.to_string()),
            ChatError::MissingCredential | ChatError::EmptyInput => ApiError::BadRequest(shown),
            ChatError::Settings(PersistError::EmptyValue(_)) => ApiError::BadRequest(shown),
            ChatError::Settings(e) => ApiError::Persist(e),
            ChatError::Completion(e) => {
                tracing::error!("Completion error: {:#}", e);
                ApiError::Upstream(shown)
            }
            ChatError::MalformedResponse => ApiError::Upstream(shown),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::WorkspaceNotFound(_) | ApiError::ThreadNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upstream(ref msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
