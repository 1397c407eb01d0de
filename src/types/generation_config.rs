use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// Default nucleus sampling probability.
pub const DEFAULT_TOP_P: f64 = 1.0;

/// Default top-k sampling limit.
pub const DEFAULT_TOP_K: u32 = 1;

/// Default maximum number of output tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Sampling parameters applied to every generation request.
///
/// Missing fields take their defaults when deserialized, so a configuration
/// file only needs to name the values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Controls the randomness of the output.
    pub temperature: f64,

    /// Maximum cumulative probability of tokens considered when sampling.
    pub top_p: f64,

    /// Maximum number of tokens considered when sampling.
    pub top_k: u32,

    /// Maximum number of tokens to include in a candidate.
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Creates a new GenerationConfig with default values.
    ///
    /// Defaults:
    /// - Temperature: 0.9
    /// - Top-p: 1.0
    /// - Top-k: 1
    /// - Max output tokens: 1024
    pub fn new() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the top-p value.
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets the top-k value.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the maximum output tokens.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Checks that every parameter is inside the range the API accepts.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::validation(
                format!("temperature must be between 0.0 and 2.0, got {}", self.temperature),
                Some("temperature".to_string()),
            ));
        }
        if !self.top_p.is_finite() || !(0.0..=1.0).contains(&self.top_p) {
            return Err(Error::validation(
                format!("top_p must be between 0.0 and 1.0, got {}", self.top_p),
                Some("top_p".to_string()),
            ));
        }
        if self.top_k == 0 {
            return Err(Error::validation(
                "top_k must be at least 1",
                Some("top_k".to_string()),
            ));
        }
        if self.max_output_tokens == 0 {
            return Err(Error::validation(
                "max_output_tokens must be at least 1",
                Some("max_output_tokens".to_string()),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}
