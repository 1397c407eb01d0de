//! Configuration types for the healthcare chat.
//!
//! This module provides CLI argument parsing via `arrrg` and the presentation
//! settings of a chat session.  The model configuration is resolved
//! separately through [`ModelConfig`].

use arrrg_derive::CommandLine;

use crate::config::{ApiKey, ModelConfig};
use crate::prompt::HEALTHCARE_PREFIX;
use crate::Result;

/// Title shown when the chat starts.
pub const TITLE: &str = "Healthcare Gemini Chatbot";

/// Disclaimer shown under the title.
pub const SUBTITLE: &str = "Ask me anything related to healthcare! (Please consult a medical professional for actual advice.)";

/// Assistant turn every new conversation starts with.
pub const GREETING: &str = "Hello! How can I help you with your healthcare questions today?";

/// Hint shown after a failed request.
pub const ERROR_HINT: &str = "The chatbot is designed to answer healthcare-related questions. Please try rephrasing your question or ask something related to healthcare.";

/// Command-line arguments for the healthcare-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.0-flash)", "MODEL")]
    pub model: Option<String>,

    /// YAML file with model, generation and safety settings.
    #[arrrg(optional, "YAML model configuration file", "FILE")]
    pub config: Option<String>,

    /// Environment variable holding the API key.
    #[arrrg(optional, "Read the API key from this variable (default: GEMINI_API_KEY, then GOOGLE_API_KEY)", "VAR")]
    pub api_key_env: Option<String>,

    /// Start without the assistant greeting.
    #[arrrg(flag, "Start the conversation without a greeting")]
    pub no_greeting: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log every request and response to stderr.
    #[arrrg(flag, "Log API traffic to stderr")]
    pub verbose: bool,
}

impl ChatArgs {
    /// Resolve the API key named by the arguments.
    pub fn api_key(&self) -> Result<ApiKey> {
        match &self.api_key_env {
            Some(var) => ApiKey::from_env_var(var),
            None => ApiKey::from_env(),
        }
    }

    /// Resolve the model configuration named by the arguments.
    pub fn model_config(&self) -> Result<ModelConfig> {
        ModelConfig::resolve(self.config.as_deref(), self.model.as_deref())
    }
}

/// Configuration for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Title printed at startup.
    pub title: String,

    /// Subtitle printed under the title.
    pub subtitle: String,

    /// Greeting seeded into every new transcript, if any.
    pub greeting: Option<String>,

    /// Prefix wrapped around every user turn when it is sent.
    pub user_prefix: String,

    /// Hint shown after a failed request.
    pub error_hint: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log API traffic.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with the healthcare defaults.
    pub fn new() -> Self {
        Self {
            title: TITLE.to_string(),
            subtitle: SUBTITLE.to_string(),
            greeting: Some(GREETING.to_string()),
            user_prefix: HEALTHCARE_PREFIX.to_string(),
            error_hint: ERROR_HINT.to_string(),
            use_color: true,
            verbose: false,
        }
    }

    /// Sets or clears the greeting.
    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        self.greeting = greeting;
        self
    }

    /// Sets the user prefix.
    pub fn with_user_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_prefix = prefix.into();
        self
    }

    /// Sets the error hint.
    pub fn with_error_hint(mut self, hint: impl Into<String>) -> Self {
        self.error_hint = hint.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables traffic logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ChatArgs> for ChatConfig {
    fn from(args: &ChatArgs) -> Self {
        let config = ChatConfig::new().with_verbose(args.verbose);
        let config = if args.no_greeting {
            config.with_greeting(None)
        } else {
            config
        };
        if args.no_color {
            config.without_color()
        } else {
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KnownModel, Model};

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.title, "Healthcare Gemini Chatbot");
        assert_eq!(
            config.greeting.as_deref(),
            Some("Hello! How can I help you with your healthcare questions today?")
        );
        assert_eq!(config.user_prefix, "Healthcare related question: ");
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(&ChatArgs::default());
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            no_greeting: true,
            no_color: true,
            verbose: true,
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(&args);
        assert!(config.greeting.is_none());
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn model_config_from_args() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            ..ChatArgs::default()
        };
        let config = args.model_config().unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
    }

    #[test]
    fn missing_named_key_variable() {
        let args = ChatArgs {
            api_key_env: Some("GEMINUS_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..ChatArgs::default()
        };
        assert!(args.api_key().unwrap_err().is_authentication());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_greeting(Some("Hi".to_string()))
            .with_user_prefix("Q: ")
            .with_error_hint("try again")
            .without_color()
            .with_verbose(true);
        assert_eq!(config.greeting.as_deref(), Some("Hi"));
        assert_eq!(config.user_prefix, "Q: ");
        assert_eq!(config.error_hint, "try again");
        assert!(!config.use_color);
        assert!(config.verbose);
    }
}
