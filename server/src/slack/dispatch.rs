//! Handler invocation.

use std::time::Duration;

use tracing::{error, instrument, warn};

use crate::commands::{HandlerError, HandlerResult, RegisteredHandler};

use super::types::SlashRequest;

pub const TIMED_OUT_MESSAGE: &str = "Command timed out";
pub const PANICKED_MESSAGE: &str = "Command failed unexpectedly";

/// Invoke the handler once and wait for its single result.
///
/// The handler runs on its own task so a panic surfaces as a [`HandlerError`]
/// instead of tearing down the request. With a `timeout`, a handler that has
/// not completed in time is aborted and reported as timed out.
#[instrument(skip_all, fields(command = %registered.command()))]
pub async fn dispatch(
    registered: &RegisteredHandler,
    request: SlashRequest,
    timeout: Option<Duration>,
) -> HandlerResult {
    let handler = registered.handler();
    let mut task = tokio::spawn(async move { handler.handle(&request).await });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                task.abort();
                warn!(
                    timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    "Handler timed out"
                );
                return Err(HandlerError::new(TIMED_OUT_MESSAGE));
            }
        },
        None => task.await,
    };

    joined.unwrap_or_else(|e| {
        error!("Handler task failed: {}", e);
        Err(HandlerError::new(PANICKED_MESSAGE))
    })
}
