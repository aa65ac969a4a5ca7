use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports whether a completion credential is stored and whether sync is on.
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let mut services = HashMap::new();

    let openrouter = match state.session.settings().openrouter_key() {
        Ok(Some(_)) => "configured",
        Ok(None) => "missing_key",
        Err(e) => {
            tracing::warn!("Settings unreadable during health check: {}", e);
            "unavailable"
        }
    };
    services.insert("openrouter".to_string(), openrouter.to_string());

    let sync = if state.sync_enabled { "enabled" } else { "disabled" };
    services.insert("sync".to_string(), sync.to_string());

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        services,
    }))
}
