//! Generation provider integration
//!
//! [`LlmClient`] is the seam to the external text-generation service. The
//! rest of the crate only ever talks to a [`GenerationClient`], which adds
//! timing and a per-call timeout on top of whichever provider is configured.

pub mod gemini;
pub mod generation;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{non_empty, parse_opt, parse_or};
use crate::error::ConfigError;

pub use generation::GenerationClient;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Default per-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// Provider failure. Recovered at each artifact boundary, never surfaced to
/// callers of the enrichment pipeline.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("No API key configured")]
    MissingApiKey,
}

pub type AiResult<T> = Result<T, AiError>;

/// Provider settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl AiConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_seconds = parse_or("GENERATION_TIMEOUT_SECS", lookup, DEFAULT_TIMEOUT_SECONDS)?;
        if timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "GENERATION_TIMEOUT_SECS",
                "0",
                "timeout must be at least one second",
            ));
        }

        Ok(Self {
            api_key: non_empty(lookup("GEMINI_API_KEY")).unwrap_or_default(),
            model: non_empty(lookup("GEMINI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_opt("GEMINI_MAX_TOKENS", lookup)?,
            temperature: parse_opt("GEMINI_TEMPERATURE", lookup)?,
            timeout_seconds,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// True when a usable key is present
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Single-shot, stateless text generation
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt, return the raw generated text
    async fn generate(&self, prompt: &str) -> AiResult<String>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}

/// Stand-in provider used when no API key is configured.
/// Every call fails, so every artifact resolves to its fallback text.
#[derive(Debug, Clone, Default)]
pub struct DisabledClient;

#[async_trait]
impl LlmClient for DisabledClient {
    async fn generate(&self, _prompt: &str) -> AiResult<String> {
        Err(AiError::MissingApiKey)
    }

    fn model_name(&self) -> &str {
        "none"
    }

    fn provider_name(&self) -> &str {
        "Disabled"
    }
}
