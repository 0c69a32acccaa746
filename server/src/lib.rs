//! Slashgate Server
//!
//! Receives slash command callbacks from a chat platform, authenticates them
//! and routes them to pluggable command handlers.

pub mod api;
pub mod commands;
pub mod config;
pub mod slack;
