//! Slash Command Handlers
//!
//! The capability contract every pluggable handler implements, the static
//! catalog of handler kinds, and the immutable registry built from the
//! handler manifest at startup.

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod tokens;
pub mod workspace;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::slack::SlashRequest;

pub use catalog::{HandlerCatalog, HandlerInit};
pub use error::{ManifestError, RegistrationError};
pub use manifest::{HandlerDescriptor, Manifest};
pub use registry::{CommandRegistry, RegisteredHandler};
pub use tokens::{EnvTokens, TokenSource};
pub use workspace::{CommandDirs, CommandWorkspace};

/// Payload key a handler sets to request the delayed response path.
pub const DELAYED_RESPONSE_FLAG: &str = "isDelayedResponse";

/// Option key carrying the handler's working directory on disk.
pub const WORK_DIR_OPTION: &str = "work_dir";

/// Option key carrying the public URL path of the handler's working directory.
pub const PUBLIC_PATH_OPTION: &str = "public_path";

/// A slash command handler.
///
/// Each call produces exactly one [`HandlerResult`]. Handlers are shared across
/// concurrent requests and must not rely on per-request exclusivity.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Handle one invocation of the command.
    async fn handle(&self, request: &SlashRequest) -> HandlerResult;
}

/// Successful handler output.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// Envelope fields, optionally carrying [`DELAYED_RESPONSE_FLAG`].
    Payload(Map<String, Value>),
    /// Plain reply text.
    Text(String),
}

impl HandlerOutput {
    /// Build output from an arbitrary JSON value.
    ///
    /// Objects become payloads, strings become text, anything else is rendered
    /// as its JSON text.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::Payload(fields),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }

    /// Payload that asks for the delayed response path.
    pub fn delayed(mut fields: Map<String, Value>) -> Self {
        fields.insert(DELAYED_RESPONSE_FLAG.to_string(), Value::Bool(true));
        Self::Payload(fields)
    }
}

/// A failure reported by a handler. Shown to the caller as reply text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The single completion of a handler invocation.
pub type HandlerResult = Result<HandlerOutput, HandlerError>;

/// Free-form handler configuration from the manifest.
///
/// The registry injects [`WORK_DIR_OPTION`] and [`PUBLIC_PATH_OPTION`] before
/// the handler is constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerOptions(Map<String, Value>);

impl HandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Boolean option, `false` when absent or not a boolean.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn work_dir(&self) -> Option<std::path::PathBuf> {
        self.get_str(WORK_DIR_OPTION).map(std::path::PathBuf::from)
    }

    pub fn public_path(&self) -> Option<&str> {
        self.get_str(PUBLIC_PATH_OPTION)
    }
}

impl From<Map<String, Value>> for HandlerOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
