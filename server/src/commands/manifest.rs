//! Handler Manifest
//!
//! Static list of commands to register, loaded once at startup.
//!
//! ```json
//! {
//!   "handlers": [
//!     { "command": "echo", "handler": "echo", "token_var": "ECHO_TOKEN" },
//!     { "command": "motd", "handler": "static-text", "token_var": "MOTD_TOKEN",
//!       "options": { "text": "Deploy freeze until Friday", "in_channel": true } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ManifestError;
use super::HandlerOptions;

/// One command entry in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerDescriptor {
    /// Command name, matched against the `/svc/slack/{command}` path segment.
    pub command: String,
    /// Handler kind, looked up in the [`HandlerCatalog`](super::HandlerCatalog).
    pub handler: String,
    /// Name of the environment variable holding the command's shared secret.
    pub token_var: String,
    /// Handler-specific options.
    #[serde(default)]
    pub options: HandlerOptions,
}

/// The full handler manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub handlers: Vec<HandlerDescriptor>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        info!(path = %path.display(), "Loading handler manifest");
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
