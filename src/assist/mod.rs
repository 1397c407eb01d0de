//! The study assistant: one templated prompt per submission.
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: mode selection and the submit cycle
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod session;

pub use crate::modes::{InputWidget, Mode, ModeSpec};
pub use crate::render::{PlainTextRenderer, Renderer, RequestPhase};
pub use commands::{AssistCommand, LineAction, classify_line, help_text, parse_command};
pub use config::{AssistArgs, AssistConfig, ERROR_HINT, SUBTITLE, TITLE};
pub use session::AssistSession;
