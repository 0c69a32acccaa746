//! API Router and Application State
//!
//! Central routing configuration and shared state.

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    commands::CommandRegistry,
    config::{normalize_public_path_prefix, Config},
    slack,
    slack::DelayedResponder,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Registered slash commands, read-only after startup
    pub registry: Arc<CommandRegistry>,
    /// Client for delayed responses
    pub responder: DelayedResponder,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, registry: CommandRegistry, responder: DelayedResponder) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            responder,
        }
    }
}

/// Create the main application router.
///
/// Fails when the public path prefix would overlap an API route.
pub fn create_router(state: AppState) -> Result<Router> {
    let max_body_size = state.config.max_body_size;

    // Files written by handlers into their working directories
    let public_prefix = normalize_public_path_prefix(&state.config.public_path_prefix)?;
    let public_files = ServeDir::new(&state.config.work_dir);

    let router = Router::new()
        // Health check
        .route("/_health", get(health_check))
        // Slash command callbacks
        .merge(slack::router())
        .nest_service(&public_prefix, public_files)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_size))
        // State
        .with_state(state);

    Ok(router)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
