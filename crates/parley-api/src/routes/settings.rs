use axum::{extract::State, Json};
use parley_persist::SettingsSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveKeyRequest {
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemPromptRequest {
    pub prompt: String,
}

/// Current settings with credentials masked
pub async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<SettingsSnapshot>> {
    Ok(Json(state.session.settings().snapshot()?))
}

pub async fn save_openrouter_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveKeyRequest>,
) -> ApiResult<Json<SettingsSnapshot>> {
    state.session.save_openrouter_key(&req.key)?;
    get_settings(State(state)).await
}

pub async fn save_gemini_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveKeyRequest>,
) -> ApiResult<Json<SettingsSnapshot>> {
    state.session.save_gemini_key(&req.key)?;
    get_settings(State(state)).await
}

pub async fn set_system_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SystemPromptRequest>,
) -> ApiResult<Json<SettingsSnapshot>> {
    state.session.set_system_prompt(&req.prompt)?;
    get_settings(State(state)).await
}
