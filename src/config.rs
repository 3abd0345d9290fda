//! Model-call configuration read from the environment.

use crate::constants::{DEFAULT_API_BASE, DEFAULT_MODEL, MAX_OUTPUT_TOKENS, TEMPERATURE};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Alternative API key variable used by the web build of the app.
pub const LEGACY_API_KEY_VAR: &str = "VITE_GOOGLE_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "CODE_CANVAS_MODEL";
/// Environment variable overriding the API base URL.
pub const API_BASE_VAR: &str = "CODE_CANVAS_API_BASE";

/// Settings for the hosted model client.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// API key; `None` makes every call fail with a missing-key error
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.0-flash`
    pub model: String,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Output token cap
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

impl ModelConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset. A missing API key is logged but not fatal.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of a variable, if set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read(API_KEY_VAR).or_else(|| read(LEGACY_API_KEY_VAR));
        if api_key.is_none() {
            log::error!("API key is missing! Make sure {API_KEY_VAR} is set.");
        }

        let defaults = Self::default();
        Self {
            api_key,
            model: read(MODEL_VAR).unwrap_or(defaults.model),
            base_url: read(API_BASE_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            ..defaults
        }
    }
}
