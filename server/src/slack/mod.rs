//! Slash Command Endpoint
//!
//! Authenticates inbound slash command callbacks, dispatches them to the
//! registered handler and normalizes the result into the platform's envelope.

pub mod auth;
pub mod delayed;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod respond;
pub mod types;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use auth::authenticate;
pub use delayed::{DelayedResponder, DeliveryError};
pub use dispatch::dispatch;
pub use error::SlashError;
pub use respond::{normalize, Reply};
pub use types::{ResponseEnvelope, ResponseType, SlashRequest};

/// Create the slash command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/svc/slack/{command}", post(handlers::handle_slash_command))
        .route("/svc/slack/{command}/", post(handlers::handle_slash_command))
        .route("/svc/slack", post(handlers::missing_command))
        .route("/svc/slack/", post(handlers::missing_command))
}
