//! Delayed Response Delivery
//!
//! Posts a normalized envelope to the caller-supplied `response_url` after the
//! HTTP request has been acknowledged. Delivery is fire-and-forget: failures
//! are logged and never retried.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::types::ResponseEnvelope;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("request to response_url failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response_url returned HTTP {0}")]
    Status(u16),
}

/// HTTP client for delayed responses.
#[derive(Debug, Clone)]
pub struct DelayedResponder {
    http: reqwest::Client,
}

impl DelayedResponder {
    /// Build a responder whose POSTs give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// POST `envelope` as JSON to `url`, succeeding only on a 2xx status.
    pub async fn deliver(&self, url: &str, envelope: &ResponseEnvelope) -> Result<(), DeliveryError> {
        let resp = self.http.post(url).json(envelope).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status.as_u16()))
        }
    }

    /// Deliver in the background once `acked` resolves.
    ///
    /// `acked` completes when the acknowledgement has been handed to the
    /// server, either by a send or by its sender being dropped. Returns `None`
    /// without sending anything when the request carried no `response_url`.
    pub fn spawn(
        &self,
        command: &str,
        response_url: Option<String>,
        envelope: ResponseEnvelope,
        acked: oneshot::Receiver<()>,
    ) -> Option<JoinHandle<()>> {
        let Some(url) = response_url.filter(|u| !u.is_empty()) else {
            warn!(
                command = %command,
                "Delayed response requested but request has no response_url, dropping reply"
            );
            return None;
        };

        let responder = self.clone();
        let command = command.to_string();
        Some(tokio::spawn(async move {
            let _ = acked.await;
            let start = std::time::Instant::now();
            match responder.deliver(&url, &envelope).await {
                Ok(()) => info!(
                    command = %command,
                    latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Delivered delayed response"
                ),
                Err(e) => error!(
                    command = %command,
                    url = %url,
                    error = %e,
                    "Failed to deliver delayed response"
                ),
            }
        }))
    }
}
