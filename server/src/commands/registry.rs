//! Command Registry
//!
//! Built once at startup from the handler manifest and never mutated
//! afterwards, so it is shared across requests behind an `Arc` without locks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::catalog::{HandlerCatalog, HandlerInit};
use super::error::RegistrationError;
use super::manifest::HandlerDescriptor;
use super::tokens::TokenSource;
use super::workspace::CommandWorkspace;
use super::{SlashCommand, PUBLIC_PATH_OPTION, WORK_DIR_OPTION};

/// A command with its shared secret and live handler.
#[derive(Clone)]
pub struct RegisteredHandler {
    command: String,
    token: String,
    handler: Arc<dyn SlashCommand>,
}

impl RegisteredHandler {
    pub fn new(
        command: impl Into<String>,
        token: impl Into<String>,
        handler: Arc<dyn SlashCommand>,
    ) -> Self {
        Self {
            command: command.into(),
            token: token.into(),
            handler,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn handler(&self) -> Arc<dyn SlashCommand> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for RegisteredHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredHandler")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

/// Immutable map of command name to registered handler.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, RegisteredHandler>,
}

impl CommandRegistry {
    /// Register every descriptor in order.
    ///
    /// A descriptor that fails to register is logged and skipped; its command
    /// stays unavailable while the rest register normally. A later descriptor
    /// for an already registered command replaces the earlier one.
    pub fn build(
        descriptors: &[HandlerDescriptor],
        tokens: &dyn TokenSource,
        workspace: &CommandWorkspace,
        catalog: &HandlerCatalog,
    ) -> Self {
        let mut handlers = HashMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            match register(descriptor, tokens, workspace, catalog) {
                Ok(registered) => {
                    info!(
                        command = %descriptor.command,
                        handler = %descriptor.handler,
                        "Registered slash command"
                    );
                    if handlers
                        .insert(descriptor.command.clone(), registered)
                        .is_some()
                    {
                        warn!(
                            command = %descriptor.command,
                            "Duplicate command in manifest, later entry replaces earlier one"
                        );
                    }
                }
                Err(e) => {
                    error!(
                        command = %descriptor.command,
                        handler = %descriptor.handler,
                        error = %e,
                        "Failed to register slash command, command will be unavailable"
                    );
                }
            }
        }

        Self { handlers }
    }

    /// Registry holding exactly the given handlers.
    pub fn from_handlers(handlers: impl IntoIterator<Item = RegisteredHandler>) -> Self {
        Self {
            handlers: handlers
                .into_iter()
                .map(|h| (h.command.clone(), h))
                .collect(),
        }
    }

    pub fn lookup(&self, command: &str) -> Option<&RegisteredHandler> {
        self.handlers.get(command)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }
}

fn register(
    descriptor: &HandlerDescriptor,
    tokens: &dyn TokenSource,
    workspace: &CommandWorkspace,
    catalog: &HandlerCatalog,
) -> Result<RegisteredHandler, RegistrationError> {
    validate_command_name(&descriptor.command)?;

    let token = tokens.resolve(&descriptor.token_var).unwrap_or_else(|| {
        warn!(
            command = %descriptor.command,
            token_var = %descriptor.token_var,
            "Command token is not set, every request to it will be rejected"
        );
        String::new()
    });

    let dirs = workspace.prepare(&descriptor.command)?;
    let mut options = descriptor.options.clone();
    options.insert(WORK_DIR_OPTION, dirs.fs_path.display().to_string());
    options.insert(PUBLIC_PATH_OPTION, dirs.public_path);

    let handler = catalog.construct(
        &descriptor.handler,
        HandlerInit {
            command: descriptor.command.clone(),
            token: token.clone(),
            options,
        },
    )?;

    Ok(RegisteredHandler::new(&descriptor.command, token, handler))
}

/// Command names double as directory names, so they are kept to a safe charset.
fn validate_command_name(name: &str) -> Result<(), RegistrationError> {
    let valid = !name.is_empty()
        && name.len() <= 32
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RegistrationError::InvalidCommandName(name.to_string()))
    }
}
