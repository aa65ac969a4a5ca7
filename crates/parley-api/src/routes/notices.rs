use axum::{extract::State, Json};
use parley_types::Notice;
use std::sync::Arc;

use crate::state::AppState;

/// Hand out every pending notice, oldest first. Each is returned once.
pub async fn drain_notices(State(state): State<Arc<AppState>>) -> Json<Vec<Notice>> {
    Json(state.notices.drain())
}
