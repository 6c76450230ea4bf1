//! Completion client configuration.

use std::env;
use std::time::Duration;

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Low enough to keep replies on the sales script.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_MAX_TOKENS: u32 = 600;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved settings for the chat completion provider.
#[derive(Clone)]
pub struct LlmConfig {
    /// Bearer token; requests fail fast with `MissingApiKey` when absent.
    pub api_key: Option<String>,
    /// Base URL; `/chat/completions` is appended.
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable          | Default                           |
    /// |-------------------|-----------------------------------|
    /// | `GROQ_API_KEY`    | none (`LLM_API_KEY` also accepted) |
    /// | `LLM_API_BASE`    | `https://api.groq.com/openai/v1`  |
    /// | `LLM_MODEL`       | `llama-3.3-70b-versatile`         |
    /// | `LLM_TEMPERATURE` | `0.5`                             |
    /// | `LLM_MAX_TOKENS`  | `600`                             |
    /// | `LLM_TIMEOUT_SECS`| `30`                              |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("GROQ_API_KEY")
            .or_else(|_| env::var("LLM_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self {
            api_key,
            api_base: env::var("LLM_API_BASE").unwrap_or(defaults.api_base),
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            temperature: env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            max_tokens: env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            timeout: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}
