//! Handler Registration Errors

use std::path::PathBuf;

use thiserror::Error;

/// Why a manifest entry could not be registered.
///
/// Registration errors never reach a request: the registry logs them and the
/// command stays unavailable.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Command name is empty, too long, or contains disallowed characters.
    #[error("Command name must be 1-32 characters of lowercase letters, digits, hyphens or underscores: {0:?}")]
    InvalidCommandName(String),

    /// No constructor is registered for the handler kind.
    #[error("Unknown handler kind: {0}")]
    UnknownHandler(String),

    /// The handler rejected its options.
    #[error("Invalid options for handler {kind}: {reason}")]
    InvalidOptions { kind: String, reason: String },

    /// The per-command working directory could not be created.
    #[error("Cannot prepare working directory {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistrationError {
    pub fn invalid_options(kind: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors loading the handler manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Cannot read handler manifest at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid handler manifest: {0}")]
    Parse(#[from] serde_json::Error),
}
