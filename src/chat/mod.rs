//! The healthcare chat: a conversational REPL over a streamed model.
//!
//! This module provides a streaming chat session built on top of the geminus
//! client library. It supports:
//!
//! - Streaming responses drawn frame by frame with a typing cursor
//! - A session transcript seeded with a greeting and sent back as history
//! - Rollback of the pending question when a request fails
//! - Slash commands for session control
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: transcript ownership and the send/rollback cycle
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer, RequestPhase};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, ERROR_HINT, GREETING, SUBTITLE, TITLE};
pub use session::{ChatSession, SessionStats};
