//! Slash command authentication.

use crate::commands::{CommandRegistry, RegisteredHandler};

use super::error::SlashError;

/// Resolve the registered handler for `command` and check the caller's token.
///
/// Unknown commands are rejected before the token is looked at, so a caller
/// probing command names always gets `NotFound`. The token must equal the
/// command's secret exactly; an empty secret never matches.
pub fn authenticate<'a>(
    registry: &'a CommandRegistry,
    command: &str,
    token: Option<&str>,
) -> Result<&'a RegisteredHandler, SlashError> {
    if command.is_empty() {
        return Err(SlashError::NotFound);
    }
    let registered = registry.lookup(command).ok_or(SlashError::NotFound)?;

    match token {
        Some(token) if !token.is_empty() && token == registered.token() => Ok(registered),
        _ => Err(SlashError::Unauthorized),
    }
}
