//! Local HTTP surface for Parley: workspaces, threads, settings and the
//! notices raised along the way.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::routes::{health, notices, settings, threads, workspaces};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let local = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Workspaces
        .route(
            "/workspaces",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route("/workspaces/:workspace_id/threads", post(workspaces::create_thread))
        .route("/workspaces/:workspace_id/model", put(workspaces::change_model))
        // Threads
        .route("/threads/:thread_id", get(threads::get_thread))
        // Settings
        .route("/settings", get(settings::get_settings))
        .route("/settings/openrouter-key", put(settings::save_openrouter_key))
        .route("/settings/gemini-key", put(settings::save_gemini_key))
        .route("/settings/system-prompt", put(settings::set_system_prompt))
        // Notices
        .route("/notices", get(notices::drain_notices))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )));

    // Provider round-trips run unbounded; a dropped handler would abort the
    // send before its failure notice is raised.
    let provider = Router::new()
        .route("/workspaces/:workspace_id/models", get(workspaces::list_models))
        .route("/threads/:thread_id/messages", post(threads::send_message));

    local
        .merge(provider)
        .layer(axum_middleware::from_fn(middleware::logging::log_request))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::permissive();
    }

    let mut cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
