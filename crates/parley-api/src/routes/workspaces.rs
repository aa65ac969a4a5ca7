use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parley_chat::QueryState;
use parley_types::{Thread, Workspace, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeModelRequest {
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ListWorkspacesResponse {
    pub workspaces: Vec<Workspace>,
}

pub async fn list_workspaces(State(state): State<Arc<AppState>>) -> Json<ListWorkspacesResponse> {
    Json(ListWorkspacesResponse {
        workspaces: state.session.workspaces().await,
    })
}

pub async fn create_workspace(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Workspace>) {
    let workspace = state.session.create_workspace().await;
    (StatusCode::CREATED, Json(workspace))
}

/// Create a thread that starts out on the workspace's current model
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    Path(workspace_id): Path<WorkspaceId>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let thread = state.session.create_thread(workspace_id).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

/// Switch the workspace model; every thread in it follows
pub async fn change_model(
    State(state): State<Arc<AppState>>,
    Path(workspace_id): Path<WorkspaceId>,
    Json(req): Json<ChangeModelRequest>,
) -> ApiResult<Json<Workspace>> {
    let model = req.model.trim();
    if model.is_empty() {
        return Err(ApiError::BadRequest("model must not be empty".to_string()));
    }

    let workspace = state
        .session
        .change_workspace_model(workspace_id, model)
        .await?;
    Ok(Json(workspace))
}

/// Models the provider offers, as a finished catalog query
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    Path(workspace_id): Path<WorkspaceId>,
) -> ApiResult<Json<QueryState>> {
    if state.session.workspace(workspace_id).await.is_none() {
        return Err(ApiError::WorkspaceNotFound(workspace_id.to_string()));
    }

    let query = state.session.catalog().query();
    Ok(Json(query.wait().await))
}
