// Public modules
pub mod assist;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod completion;
pub mod config;
pub mod error;
pub mod modes;
pub mod prompt;
pub mod render;
pub mod sse;
pub mod transcript;
pub mod types;

mod observability;

// Re-exports
pub use client::{ChunkStream, Gemini};
pub use client_logger::{ClientLogger, StderrLogger};
pub use completion::{Completion, GenerativeModel, RemoteChat, TextChunks};
pub use config::{ApiKey, ModelConfig};
pub use error::{Error, Result};
pub use modes::{InputWidget, Mode};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer, RequestPhase, StreamingText};
pub use transcript::{Speaker, Transcript, Turn};
pub use types::*;
