//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Path of the JSON handler manifest
    pub handlers_manifest: PathBuf,

    /// Root of the per-command working directories
    pub work_dir: PathBuf,

    /// URL prefix under which `work_dir` is served (e.g., "/files")
    pub public_path_prefix: String,

    /// Handler completion limit (default: none)
    pub handler_timeout: Option<Duration>,

    /// Delayed response POST limit (default: 10s)
    pub delayed_response_timeout: Duration,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let handler_timeout = match lookup("HANDLER_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v
                    .trim()
                    .parse()
                    .context("HANDLER_TIMEOUT_SECS must be a whole number of seconds")?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let delayed_response_timeout = match lookup("DELAYED_RESPONSE_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .context("DELAYED_RESPONSE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 10,
        };

        let max_body_size = match lookup("MAX_BODY_SIZE") {
            Some(v) => v
                .trim()
                .parse()
                .context("MAX_BODY_SIZE must be a number of bytes")?,
            None => 1024 * 1024, // 1MB
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".into()),
            handlers_manifest: lookup("HANDLERS_MANIFEST")
                .unwrap_or_else(|| "handlers.json".into())
                .into(),
            work_dir: lookup("WORK_DIR")
                .unwrap_or_else(|| "data/commands".into())
                .into(),
            public_path_prefix: normalize_public_path_prefix(
                &lookup("PUBLIC_PATH_PREFIX").unwrap_or_else(|| "/files".into()),
            )?,
            handler_timeout,
            delayed_response_timeout: Duration::from_secs(delayed_response_timeout),
            max_body_size,
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:0".into(),
            handlers_manifest: "handlers.json".into(),
            work_dir: std::env::temp_dir().join("slashgate-test"),
            public_path_prefix: "/files".into(),
            handler_timeout: None,
            delayed_response_timeout: Duration::from_secs(5),
            max_body_size: 1024 * 1024,
        }
    }
}

/// Top-level path segments owned by the API routes.
const RESERVED_SEGMENTS: &[&str] = &["_health", "svc"];

/// Normalize a public path prefix to a leading slash and no trailing slash.
///
/// The root path and prefixes under an API route are rejected since they
/// would overlap its routes.
pub fn normalize_public_path_prefix(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        bail!("PUBLIC_PATH_PREFIX must not be empty or \"/\"");
    }
    let first = trimmed.split('/').next().unwrap_or_default();
    if RESERVED_SEGMENTS.contains(&first) {
        bail!("PUBLIC_PATH_PREFIX must not be under /{first}");
    }
    Ok(format!("/{trimmed}"))
}
