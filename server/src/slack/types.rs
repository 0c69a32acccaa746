//! Slash Command Wire Types
//!
//! The inbound command request and the response envelope sent back to the
//! platform.

use std::convert::Infallible;

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// An inbound slash command invocation.
///
/// Accepted as `application/x-www-form-urlencoded` (what the platform sends)
/// or `application/json`. An unreadable body yields an empty request, which
/// authentication then rejects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashRequest {
    /// Command name from the request path.
    #[serde(skip)]
    pub command: String,
    /// Shared secret presented by the caller.
    #[serde(default)]
    pub token: Option<String>,
    /// Where delayed responses are posted.
    #[serde(default)]
    pub response_url: Option<String>,
    /// Every other body field (`text`, `user_name`, `channel_id`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SlashRequest {
    /// Build a request from a JSON object of body fields.
    pub fn from_fields(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    /// String body field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// The text typed after the command, empty when absent.
    pub fn text(&self) -> &str {
        self.field("text").unwrap_or_default()
    }
}

impl<S> FromRequest<S> for SlashRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let parsed = if is_json {
            Json::<Self>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.body_text())
        } else {
            Form::<Self>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.body_text())
        };

        Ok(parsed.unwrap_or_else(|reason| {
            debug!(reason = %reason, "Unreadable slash command body, treating as empty");
            Self::default()
        }))
    }
}

/// Visibility of a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only the invoking user sees the reply.
    #[default]
    Ephemeral,
    /// Everyone in the channel sees the reply.
    InChannel,
}

impl ResponseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ephemeral => "ephemeral",
            Self::InChannel => "in_channel",
        }
    }
}

/// The JSON object returned to the platform.
///
/// Always carries `response_type`; any other fields come from the handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResponseEnvelope(Map<String, Value>);

impl ResponseEnvelope {
    /// An empty ephemeral envelope.
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert(
            "response_type".into(),
            Value::String(ResponseType::Ephemeral.as_str().into()),
        );
        Self(fields)
    }

    /// An ephemeral envelope carrying `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut envelope = Self::new();
        envelope.0.insert("text".into(), Value::String(text.into()));
        envelope
    }

    /// Overlay handler fields; they take precedence over the defaults.
    #[must_use]
    pub fn merge(mut self, fields: Map<String, Value>) -> Self {
        self.0.extend(fields);
        self
    }

    pub fn response_type(&self) -> Option<&str> {
        self.0.get("response_type").and_then(Value::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self::new()
    }
}
