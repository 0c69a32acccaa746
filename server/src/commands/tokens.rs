//! Handler Secret Resolution
//!
//! Each manifest entry names the variable holding its shared secret; the
//! registry resolves it through a [`TokenSource`].

use std::collections::HashMap;

/// Key/value store of handler secrets.
pub trait TokenSource {
    /// Resolve the secret stored under `name`. Empty values count as absent.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTokens;

impl TokenSource for EnvTokens {
    fn resolve(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl TokenSource for HashMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}
