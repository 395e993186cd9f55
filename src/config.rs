//! Application configuration
//!
//! Everything is read from environment variables. The server binary loads a
//! `.env` file first via `dotenvy`.

use std::str::FromStr;

use crate::ai::AiConfig;
use crate::error::ConfigError;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3001;

/// Default browser origin allowed by CORS
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Default number of submissions quoted into an admin question prompt
pub const DEFAULT_INSIGHT_CONTEXT_LIMIT: usize = 50;

/// Top-level configuration for the server process
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Postgres URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub insight_context_limit: usize,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: parse_or("PORT", &lookup, DEFAULT_PORT)?,
            cors_origin: non_empty(lookup("CORS_ORIGIN"))
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            database_url: non_empty(lookup("DATABASE_URL")),
            insight_context_limit: parse_or(
                "INSIGHT_CONTEXT_LIMIT",
                &lookup,
                DEFAULT_INSIGHT_CONTEXT_LIMIT,
            )?,
            ai: AiConfig::from_lookup(&lookup)?,
        })
    }
}

/// Treat unset and blank values the same
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an optional variable; present-but-invalid is an error
pub(crate) fn parse_opt<T, F>(key: &str, lookup: &F) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::invalid(key, &raw, e.to_string())),
    }
}

pub(crate) fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(key, lookup)?.unwrap_or(default))
}
