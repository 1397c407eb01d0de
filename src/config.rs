//! Startup configuration: the API credential and the model configuration.
//!
//! Both are resolved once when a binary starts and are immutable afterwards.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{GenerationConfig, Model, SafetySetting};
use crate::{Error, Result};

/// Environment variable consulted first for the API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable consulted when [`GEMINI_API_KEY_ENV`] is unset.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// A non-blank API key.  The key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank values.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(Error::authentication("API key is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Read the key from `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&[GEMINI_API_KEY_ENV, GOOGLE_API_KEY_ENV], |name| {
            std::env::var(name).ok()
        })
    }

    /// Read the key from the named environment variable only.
    pub fn from_env_var(name: &str) -> Result<Self> {
        Self::from_lookup(&[name], |name| std::env::var(name).ok())
    }

    /// Take the first non-blank value among `names` as returned by `lookup`.
    pub fn from_lookup(names: &[&str], lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        for name in names {
            if let Some(value) = lookup(name)
                && let Ok(key) = Self::new(value)
            {
                return Ok(key);
            }
        }
        Err(Error::authentication(format!(
            "API key not found; set {}",
            names.join(" or ")
        )))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the key.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// The model and the parameters applied to every request sent to it.
///
/// Loaded from YAML with every field optional:
///
/// ```yaml
/// model: gemini-2.0-flash
/// generation:
///   temperature: 0.4
///   maxOutputTokens: 2048
/// safety_settings:
///   - category: HARM_CATEGORY_HARASSMENT
///     threshold: BLOCK_ONLY_HIGH
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// The model to use.
    pub model: Model,

    /// Sampling parameters.
    pub generation: GenerationConfig,

    /// Per-category blocking thresholds.
    pub safety_settings: Vec<SafetySetting>,
}

impl ModelConfig {
    /// Creates a new ModelConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.0-flash
    /// - Generation: see [`GenerationConfig::new`]
    /// - Safety: see [`SafetySetting::defaults`]
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            generation: GenerationConfig::default(),
            safety_settings: SafetySetting::defaults(),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the generation config.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the safety settings.
    pub fn with_safety_settings(mut self, safety_settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = safety_settings;
        self
    }

    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ModelConfig = serde_yaml::from_str(yaml)?;
        config.generation.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Resolve command-line overrides: an optional file, then an optional model.
    pub fn resolve(config_path: Option<&str>, model: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::new(),
        };
        Ok(match model {
            Some(model) => config.with_model(Model::from(model)),
            None => config,
        })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new()
    }
}
