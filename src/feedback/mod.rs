//! Feedback domain
//!
//! Validated input, the enrichment output, and the stored submission record.
//! The pipeline stages live in the submodules:
//!
//! - [`gibberish`] - low-quality input gate
//! - [`prompts`] - prompt templates per artifact
//! - [`parser`] - raw generated text → typed artifact
//! - [`enrichment`] - concurrent orchestration with per-artifact fallback
//! - [`insights`] - dashboard statistics and admin questions

pub mod enrichment;
pub mod gibberish;
pub mod insights;
pub mod parser;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Inclusive rating bounds
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Maximum review length in characters
pub const MAX_REVIEW_CHARS: usize = 2000;

/// A validated rating + review pair. The only way into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackInput {
    rating: u8,
    review: String,
}

impl FeedbackInput {
    /// Validate and build. The stored review is trimmed.
    pub fn new(rating: i64, review: &str) -> Result<Self, ValidationError> {
        if !(i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }

        let len = review.chars().count();
        if len > MAX_REVIEW_CHARS {
            return Err(ValidationError::ReviewTooLong {
                len,
                max: MAX_REVIEW_CHARS,
            });
        }

        let trimmed = review.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyReview);
        }

        Ok(Self {
            rating: rating as u8,
            review: trimmed.to_string(),
        })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn review(&self) -> &str {
        &self.review
    }
}

/// The three generated artifacts for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Reply,
    Summary,
    Actions,
}

impl Artifact {
    pub fn label(&self) -> &'static str {
        match self {
            Artifact::Reply => "reply",
            Artifact::Summary => "summary",
            Artifact::Actions => "actions",
        }
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pipeline output. Carries no identity; the caller persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    pub user_reply: String,
    pub admin_summary: String,
    /// At most three entries
    pub recommended_actions: Vec<String>,
}

/// Outcome of one generation call before fallback is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(String),
}

impl<E: std::fmt::Display> From<Result<String, E>> for GenerationOutcome {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => GenerationOutcome::Success(text),
            Err(e) => GenerationOutcome::Failure(e.to_string()),
        }
    }
}

/// Optional details about who submitted the feedback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submitter {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Stored feedback record as shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: u8,
    pub review: String,
    pub ai_summary: String,
    pub recommended_actions: Vec<String>,
    pub user_response: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackSubmission {
    /// Assemble a new record from validated input and its enrichment
    pub fn new(input: &FeedbackInput, submitter: Submitter, enrichment: EnrichmentResult) -> Self {
        Self {
            id: new_submission_id(),
            user_id: submitter.user_id,
            name: submitter.name,
            email: submitter.email.map(|e| e.trim().to_lowercase()),
            rating: input.rating(),
            review: input.review().to_string(),
            ai_summary: enrichment.admin_summary,
            recommended_actions: enrichment.recommended_actions,
            user_response: enrichment.user_reply,
            created_at: Utc::now(),
        }
    }
}

/// `fb_` followed by a hyphen-less v4 UUID
pub fn new_submission_id() -> String {
    format!("fb_{}", Uuid::new_v4().simple())
}
