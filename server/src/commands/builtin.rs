//! Built-in handler kinds.
//!
//! - `echo`: replies with the command text
//! - `static-text`: replies with a configured message
//! - `deferred-echo`: replies with the command text via the delayed response path
//! - `note`: saves the command text to the working directory and links to it

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use super::catalog::{HandlerCatalog, HandlerInit};
use super::error::RegistrationError;
use super::{HandlerError, HandlerOutput, HandlerResult, SlashCommand};
use crate::slack::{ResponseType, SlashRequest};

/// Register every built-in kind.
pub fn register_all(catalog: &mut HandlerCatalog) {
    catalog
        .register("echo", |init| Ok(Arc::new(EchoCommand::new(&init)) as Arc<dyn SlashCommand>))
        .register("static-text", |init| {
            Ok(Arc::new(StaticTextCommand::new(&init)?) as Arc<dyn SlashCommand>)
        })
        .register("deferred-echo", |init| {
            Ok(Arc::new(DeferredEchoCommand::new(&init)) as Arc<dyn SlashCommand>)
        })
        .register("note", |init| {
            Ok(Arc::new(NoteCommand::new(&init)?) as Arc<dyn SlashCommand>)
        });
}

fn reply_fields(text: &str, in_channel: bool) -> Map<String, Value> {
    let mut fields = Map::new();
    if in_channel {
        fields.insert(
            "response_type".into(),
            Value::String(ResponseType::InChannel.as_str().into()),
        );
    }
    fields.insert("text".into(), Value::String(text.to_string()));
    fields
}

/// Replies with the text that followed the command.
#[derive(Debug)]
pub struct EchoCommand {
    in_channel: bool,
}

impl EchoCommand {
    pub fn new(init: &HandlerInit) -> Self {
        Self {
            in_channel: init.options.flag("in_channel"),
        }
    }
}

#[async_trait]
impl SlashCommand for EchoCommand {
    async fn handle(&self, request: &SlashRequest) -> HandlerResult {
        let text = request.text().trim();
        if text.is_empty() {
            return Err(HandlerError::new("Nothing to echo"));
        }
        if self.in_channel {
            Ok(HandlerOutput::Payload(reply_fields(text, true)))
        } else {
            Ok(HandlerOutput::Text(text.to_string()))
        }
    }
}

/// Replies with a message fixed in the manifest.
#[derive(Debug)]
pub struct StaticTextCommand {
    text: String,
    in_channel: bool,
}

impl StaticTextCommand {
    pub fn new(init: &HandlerInit) -> Result<Self, RegistrationError> {
        let text = init
            .options
            .get_str("text")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RegistrationError::invalid_options("static-text", "missing `text`"))?;

        Ok(Self {
            text: text.to_string(),
            in_channel: init.options.flag("in_channel"),
        })
    }
}

#[async_trait]
impl SlashCommand for StaticTextCommand {
    async fn handle(&self, _request: &SlashRequest) -> HandlerResult {
        Ok(HandlerOutput::Payload(reply_fields(&self.text, self.in_channel)))
    }
}

/// Echo whose reply is posted to the request's `response_url`.
#[derive(Debug)]
pub struct DeferredEchoCommand {
    in_channel: bool,
}

impl DeferredEchoCommand {
    pub fn new(init: &HandlerInit) -> Self {
        Self {
            in_channel: init.options.flag("in_channel"),
        }
    }
}

#[async_trait]
impl SlashCommand for DeferredEchoCommand {
    async fn handle(&self, request: &SlashRequest) -> HandlerResult {
        let text = request.text().trim();
        if text.is_empty() {
            return Err(HandlerError::new("Nothing to echo"));
        }
        Ok(HandlerOutput::delayed(reply_fields(text, self.in_channel)))
    }
}

/// Saves the command text as a file and replies with its public path.
#[derive(Debug)]
pub struct NoteCommand {
    command: String,
    work_dir: PathBuf,
    public_path: String,
}

impl NoteCommand {
    pub fn new(init: &HandlerInit) -> Result<Self, RegistrationError> {
        let work_dir = init
            .options
            .work_dir()
            .ok_or_else(|| RegistrationError::invalid_options("note", "missing `work_dir`"))?;
        let public_path = init
            .options
            .public_path()
            .ok_or_else(|| RegistrationError::invalid_options("note", "missing `public_path`"))?;

        Ok(Self {
            command: init.command.clone(),
            work_dir,
            public_path: public_path.to_string(),
        })
    }
}

#[async_trait]
impl SlashCommand for NoteCommand {
    async fn handle(&self, request: &SlashRequest) -> HandlerResult {
        let text = request.text().trim();
        if text.is_empty() {
            return Err(HandlerError::new(format!("Usage: /{} <text>", self.command)));
        }

        let file_name = format!("{}.txt", Uuid::now_v7());
        let path = self.work_dir.join(&file_name);
        if let Err(e) = tokio::fs::write(&path, text).await {
            warn!(path = %path.display(), error = %e, "Failed to save note");
            return Err(HandlerError::new("Could not save note"));
        }

        Ok(HandlerOutput::Text(format!(
            "Saved note to {}/{file_name}",
            self.public_path
        )))
    }
}
