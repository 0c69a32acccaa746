//! Slash Command HTTP Handler

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::{BodyExt, Empty};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::AppState;

use super::auth::authenticate;
use super::dispatch::dispatch;
use super::error::SlashError;
use super::respond::{normalize, Reply};
use super::types::SlashRequest;

/// Handle `POST /svc/slack/{command}` (with or without a trailing slash).
///
/// Unknown commands get 404 and bad tokens 401, both before the handler runs.
/// Otherwise the handler's result is returned as a JSON envelope, or, for a
/// delayed reply, acknowledged with an empty 200 and posted to `response_url`.
pub async fn handle_slash_command(
    State(state): State<AppState>,
    Path(command): Path<String>,
    mut request: SlashRequest,
) -> Response {
    let registered =
        match authenticate(&state.registry, &command, request.token.as_deref()) {
            Ok(registered) => registered,
            Err(e) => {
                warn!(command = %command, error = %e, "Rejected slash command");
                return e.into_response();
            }
        };

    request.command = command;
    info!(
        command = %request.command,
        user = request.field("user_name").unwrap_or_default(),
        "Handling slash command"
    );

    let response_url = request.response_url.clone();
    let result = dispatch(registered, request, state.config.handler_timeout).await;

    match normalize(result) {
        Reply::Immediate(envelope) => Json(envelope).into_response(),
        Reply::Delayed(envelope) => {
            let (ack, acked) = oneshot::channel();
            state
                .responder
                .spawn(registered.command(), response_url, envelope, acked);
            (StatusCode::OK, ack_body(ack)).into_response()
        }
    }
}

/// Empty body holding `ack` until the server has finished with it.
fn ack_body(ack: oneshot::Sender<()>) -> Body {
    Body::new(Empty::<Bytes>::new().map_frame(move |frame| {
        let _held = &ack;
        frame
    }))
}

/// A request with no command segment in the path.
pub async fn missing_command() -> SlashError {
    SlashError::NotFound
}
