//! Error types for the feedback backend
//!
//! Provider failures live in [`crate::ai::AiError`]; this module holds the
//! errors for input validation, persistence and configuration.

use thiserror::Error;

/// Rejected user input. Raised before anything reaches the enrichment pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("Review cannot be empty")]
    EmptyReview,

    #[error("Review must be at most {max} characters, got {len}")]
    ReviewTooLong { len: usize, max: usize },

    #[error("Question cannot be empty")]
    EmptyQuestion,
}

/// Persistence failures from a [`crate::database::FeedbackStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Invalid environment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
