use axum::{
    extract::{Path, State},
    Json,
};
use parley_types::{Thread, ThreadId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<ThreadId>,
) -> ApiResult<Json<Thread>> {
    state
        .session
        .thread(thread_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::ThreadNotFound(thread_id.to_string()))
}

/// Send a message and wait for the reply
///
/// Returns the thread with both messages appended. On failure the user
/// message stays in the thread and the error is also queued as a notice.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<ThreadId>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<Thread>> {
    // Owned by this request: a client that disconnects drops the task and
    // any late reply is discarded.
    let task = state.session.spawn_send(thread_id, req.content);
    task.join().await.ok_or(ApiError::Internal)??;

    get_thread(State(state), Path(thread_id)).await
}
