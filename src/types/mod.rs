// Public modules
pub mod content;
pub mod finish_reason;
pub mod generate_content;
pub mod generation_config;
pub mod model;
pub mod safety_setting;

// Re-exports
pub use content::{Content, Part, Role};
pub use finish_reason::FinishReason;
pub use generate_content::{
    Candidate, GenerateContentRequest, GenerateContentResponse, PromptFeedback, UsageMetadata,
};
pub use generation_config::GenerationConfig;
pub use model::{KnownModel, Model};
pub use safety_setting::{HarmBlockThreshold, HarmCategory, SafetyRating, SafetySetting};
