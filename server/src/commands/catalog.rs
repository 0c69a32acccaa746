//! Handler Catalog
//!
//! Maps a handler kind (the manifest's `handler` field) to a constructor.
//! The set of kinds is fixed when the catalog is built at startup; embedding
//! applications add their own with [`HandlerCatalog::register`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::RegistrationError;
use super::{builtin, HandlerOptions, SlashCommand};

/// Everything a handler receives at construction time.
#[derive(Debug, Clone)]
pub struct HandlerInit {
    pub command: String,
    pub token: String,
    pub options: HandlerOptions,
}

type Constructor =
    Box<dyn Fn(HandlerInit) -> Result<Arc<dyn SlashCommand>, RegistrationError> + Send + Sync>;

/// Constructors for every known handler kind.
#[derive(Default)]
pub struct HandlerCatalog {
    constructors: HashMap<String, Constructor>,
}

impl HandlerCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in handler kinds.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        builtin::register_all(&mut catalog);
        catalog
    }

    /// Register a constructor, replacing any previous one for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(HandlerInit) -> Result<Arc<dyn SlashCommand>, RegistrationError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors.insert(kind.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Known kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Construct a handler of the given kind.
    pub fn construct(
        &self,
        kind: &str,
        init: HandlerInit,
    ) -> Result<Arc<dyn SlashCommand>, RegistrationError> {
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| RegistrationError::UnknownHandler(kind.to_string()))?;
        constructor(init)
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}
