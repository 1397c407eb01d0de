//! Configuration types for the study assistant.

use arrrg_derive::CommandLine;

use crate::config::{ApiKey, ModelConfig};
use crate::modes::Mode;
use crate::Result;

/// Title shown when the assistant starts.
pub const TITLE: &str = "Study Assistant";

/// Line shown under the title.
pub const SUBTITLE: &str = "Debug code, explain topics and learn data analysis concepts with Gemini.";

/// Hint shown after a failed request.
pub const ERROR_HINT: &str = "Please check your connection or rephrase your input and try again.";

/// Command-line arguments for the study-assistant tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct AssistArgs {
    #[arrrg(optional, "Model to use (default: gemini-2.0-flash)", "MODEL")]
    pub model: Option<String>,

    #[arrrg(optional, "YAML model configuration file", "FILE")]
    pub config: Option<String>,

    #[arrrg(optional, "Read the API key from this variable (default: GEMINI_API_KEY, then GOOGLE_API_KEY)", "VAR")]
    pub api_key_env: Option<String>,

    /// Mode selected at startup.
    #[arrrg(optional, "Initial mode: debug, explain or data (default: debug)", "MODE")]
    pub mode: Option<String>,

    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    #[arrrg(flag, "Log API traffic to stderr")]
    pub verbose: bool,
}

impl AssistArgs {
    pub fn api_key(&self) -> Result<ApiKey> {
        match &self.api_key_env {
            Some(var) => ApiKey::from_env_var(var),
            None => ApiKey::from_env(),
        }
    }

    pub fn model_config(&self) -> Result<ModelConfig> {
        ModelConfig::resolve(self.config.as_deref(), self.model.as_deref())
    }

    /// The mode named by `--mode`, or the default mode.
    pub fn initial_mode(&self) -> Result<Mode> {
        match &self.mode {
            Some(name) => name.parse(),
            None => Ok(Mode::default()),
        }
    }
}

/// Configuration for an assistant session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistConfig {
    pub title: String,
    pub subtitle: String,

    /// Hint shown after a failed request.
    pub error_hint: String,

    /// Mode the session starts in.
    pub mode: Mode,

    pub use_color: bool,
    pub verbose: bool,
}

impl AssistConfig {
    pub fn new() -> Self {
        Self {
            title: TITLE.to_string(),
            subtitle: SUBTITLE.to_string(),
            error_hint: ERROR_HINT.to_string(),
            mode: Mode::default(),
            use_color: true,
            verbose: false,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_error_hint(mut self, hint: impl Into<String>) -> Self {
        self.error_hint = hint.into();
        self
    }

    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The mode is resolved separately with [`AssistArgs::initial_mode`], since
/// it can fail.
impl From<&AssistArgs> for AssistConfig {
    fn from(args: &AssistArgs) -> Self {
        let config = AssistConfig::new().with_verbose(args.verbose);
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

    #[test]
    fn default_config() {
        let config = AssistConfig::new();
        assert_eq!(config.title, "Study Assistant");
        assert_eq!(
            config.error_hint,
            "Please check your connection or rephrase your input and try again."
        );
        assert_eq!(config.mode, Mode::CodeDebugger);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args() {
        let args = AssistArgs {
            mode: Some("explain".to_string()),
            no_color: true,
            verbose: true,
            ..AssistArgs::default()
        };
        let config = AssistConfig::from(&args).with_mode(args.initial_mode().unwrap());
        assert_eq!(config.mode, Mode::TopicExplainer);
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let args = AssistArgs {
            mode: Some("poetry".to_string()),
            ..AssistArgs::default()
        };
        let err = args.initial_mode().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn color_follows_args() {
        assert!(AssistConfig::from(&AssistArgs::default()).use_color);
        let args = AssistArgs {
            no_color: true,
            ..AssistArgs::default()
        };
        assert!(!AssistConfig::from(&args).use_color);
        assert_eq!(args.initial_mode().unwrap(), Mode::CodeDebugger);
    }
}
